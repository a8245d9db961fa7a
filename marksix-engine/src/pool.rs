use crate::scoring::ScoreTable;

/// Meilleurs numéros par score, du plus fort au plus faible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    numbers: Vec<u8>,
}

impl Pool {
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }
}

/// Tronque le classement (score décroissant, puis numéro croissant) à `size` entrées.
pub fn select_pool(scores: &ScoreTable, size: usize) -> Pool {
    let mut ranked = scores.ranked();
    ranked.truncate(size);
    tracing::debug!(pool = ?ranked, "pool sélectionné");
    Pool { numbers: ranked }
}
