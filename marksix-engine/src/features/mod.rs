pub mod compute;

pub use compute::extract_features;

use marksix_data::models::MAX_NUMBER;

const SIDE: usize = MAX_NUMBER as usize + 1;

/// Signaux bruts d'un numéro, dérivés une fois de l'historique.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBundle {
    pub number: u8,
    pub frequency: u32,
    pub recency: f64,
    pub pair_score: u32,
    pub last_digit_score: u32,
    /// Jamais sorti dans l'historique.
    pub overdue: bool,
}

/// Matrice de co-occurrence symétrique, indexée directement par numéro (1..=49).
/// La diagonale reste à zéro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMatrix {
    counts: Vec<u32>,
}

impl Default for PairMatrix {
    fn default() -> Self {
        Self { counts: vec![0; SIDE * SIDE] }
    }
}

impl PairMatrix {
    pub fn get(&self, a: u8, b: u8) -> u32 {
        self.counts[a as usize * SIDE + b as usize]
    }

    pub(crate) fn record(&mut self, a: u8, b: u8) {
        if a == b {
            return;
        }
        self.counts[a as usize * SIDE + b as usize] += 1;
        self.counts[b as usize * SIDE + a as usize] += 1;
    }

    /// Masse totale de co-occurrence d'un numéro avec tous les autres.
    pub fn row_sum(&self, n: u8) -> u32 {
        let start = n as usize * SIDE;
        self.counts[start..start + SIDE].iter().sum()
    }

    pub fn max_row_sum(&self) -> u32 {
        (1..=MAX_NUMBER).map(|n| self.row_sum(n)).max().unwrap_or(0)
    }

    /// Partenaires non nuls de `n` : (partenaire, compte).
    pub fn partners(&self, n: u8) -> Vec<(u8, u32)> {
        (1..=MAX_NUMBER)
            .filter(|&m| m != n)
            .map(|m| (m, self.get(n, m)))
            .filter(|&(_, c)| c > 0)
            .collect()
    }
}

/// Sortie complète de l'extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    /// bundles[n - 1] pour n dans 1..=49.
    pub bundles: Vec<FeatureBundle>,
    pub pairs: PairMatrix,
    /// Fréquence cumulée par classe de dernier chiffre (n % 10).
    pub last_digit: [u32; 10],
}

impl Features {
    pub fn bundle(&self, n: u8) -> &FeatureBundle {
        &self.bundles[(n - 1) as usize]
    }

    pub fn frequency(&self, n: u8) -> u32 {
        self.bundle(n).frequency
    }

    pub fn max_frequency(&self) -> u32 {
        self.bundles.iter().map(|b| b.frequency).max().unwrap_or(0)
    }

    pub fn total_recency(&self) -> f64 {
        self.bundles.iter().map(|b| b.recency).sum()
    }

    pub fn max_last_digit(&self) -> u32 {
        self.last_digit.iter().copied().max().unwrap_or(0)
    }
}
