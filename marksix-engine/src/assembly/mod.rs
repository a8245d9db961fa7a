pub mod repair;
pub mod strategies;

use crate::config::{SumWindow, SET_SIZE};
use crate::features::Features;
use crate::pool::Pool;

pub use repair::RepairOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Conservative,
    Spread,
    Exploratory,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Conservative, Strategy::Spread, Strategy::Exploratory];

    pub fn letter(&self) -> char {
        match self {
            Strategy::Conservative => 'A',
            Strategy::Spread => 'B',
            Strategy::Exploratory => 'C',
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Conservative => write!(f, "Conservative"),
            Strategy::Spread => write!(f, "Spread"),
            Strategy::Exploratory => write!(f, "Exploratory"),
        }
    }
}

/// Tranche de valeurs utilisée pour étaler une grille : 1-17, 18-34, 35-49.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RangeBucket {
    Low,
    Mid,
    High,
}

impl RangeBucket {
    pub const ALL: [RangeBucket; 3] = [RangeBucket::Low, RangeBucket::Mid, RangeBucket::High];

    pub fn of(n: u8) -> Self {
        match n {
            0..=17 => RangeBucket::Low,
            18..=34 => RangeBucket::Mid,
            _ => RangeBucket::High,
        }
    }
}

/// Grille finale, triée par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    numbers: Vec<u8>,
}

impl CandidateSet {
    pub(crate) fn from_unsorted(mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        Self { numbers }
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn sum(&self) -> u32 {
        repair::sum_of(&self.numbers)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Faux seulement si le pool ne contenait pas assez de numéros distincts.
    pub fn is_complete(&self) -> bool {
        self.numbers.len() == SET_SIZE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub strategy: Strategy,
    pub set: CandidateSet,
    pub outcome: RepairOutcome,
}

/// Construit la liste brute d'une stratégie puis la passe à la réparation commune.
pub fn assemble(strategy: Strategy, pool: &Pool, features: &Features, window: SumWindow) -> Candidate {
    let ranked = pool.numbers();
    let raw = match strategy {
        Strategy::Conservative => strategies::conservative(ranked, features),
        Strategy::Spread => strategies::spread(ranked),
        Strategy::Exploratory => strategies::exploratory(ranked, &features.pairs),
    };
    let (set, outcome) = repair::finalize(&raw, ranked, window);

    tracing::debug!(%strategy, ?raw, set = ?set.numbers(), ?outcome, "grille assemblée");
    if !set.is_complete() {
        tracing::warn!(%strategy, len = set.len(), "pool trop petit, grille incomplète");
    }
    if outcome == RepairOutcome::OutOfWindow {
        tracing::warn!(%strategy, sum = set.sum(), "somme hors fenêtre après réparation");
    }

    Candidate { strategy, set, outcome }
}

pub fn assemble_all(pool: &Pool, features: &Features, window: SumWindow) -> Vec<Candidate> {
    Strategy::ALL
        .iter()
        .map(|&s| assemble(s, pool, features, window))
        .collect()
}
