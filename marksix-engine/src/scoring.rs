use std::cmp::Ordering;

use marksix_data::models::universe;

use crate::config::Weights;
use crate::features::{FeatureBundle, Features};

/// En dessous de cet écart max - min, tous les scores bruts sont considérés égaux.
pub const FLAT_TOLERANCE: f64 = 1e-9;

/// Les cinq signaux actifs d'un numéro, ramenés à une échelle comparable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub freq: f64,
    pub recency: f64,
    pub pair: f64,
    pub overdue: f64,
    pub lastdigit: f64,
}

impl Signals {
    pub fn weighted(&self, w: &Weights) -> f64 {
        w.freq * self.freq
            + w.recency * self.recency
            + w.pair * self.pair
            + w.overdue * self.overdue
            + w.lastdigit * self.lastdigit
    }
}

/// Diviseurs communs à tous les numéros ; un diviseur nul est remplacé par 1.
struct Divisors {
    freq: f64,
    recency: f64,
    pair: f64,
    lastdigit: f64,
}

impl Divisors {
    fn from_features(features: &Features) -> Self {
        let or_one = |v: u32| if v == 0 { 1.0 } else { v as f64 };
        Self {
            freq: or_one(features.max_frequency()),
            recency: features.total_recency(),
            pair: or_one(features.pairs.max_row_sum()),
            lastdigit: or_one(features.max_last_digit()),
        }
    }

    fn normalize(&self, b: &FeatureBundle) -> Signals {
        Signals {
            freq: b.frequency as f64 / self.freq,
            recency: if self.recency > 0.0 { b.recency / self.recency } else { 0.0 },
            pair: b.pair_score as f64 / self.pair,
            overdue: if b.frequency == 0 { 1.0 } else { 0.0 },
            lastdigit: b.last_digit_score as f64 / self.lastdigit,
        }
    }
}

pub fn normalized_signals(features: &Features) -> Vec<Signals> {
    let divisors = Divisors::from_features(features);
    features.bundles.iter().map(|b| divisors.normalize(b)).collect()
}

/// Scores normalisés dans [0, 1], un par numéro de l'univers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    scores: Vec<f64>,
}

impl ScoreTable {
    pub fn score(&self, n: u8) -> f64 {
        self.scores[(n - 1) as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        universe().zip(self.scores.iter().copied())
    }

    /// Univers trié par score décroissant ; à score égal, numéro croissant.
    pub fn ranked(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = universe().collect();
        numbers.sort_by(|&a, &b| compare_ranked(self.score(a), a, self.score(b), b));
        numbers
    }
}

pub fn compare_ranked(score_a: f64, a: u8, score_b: f64, b: u8) -> Ordering {
    score_b
        .partial_cmp(&score_a)
        .unwrap_or(Ordering::Equal)
        .then(a.cmp(&b))
}

/// Combine les signaux pondérés puis applique un min-max sur l'univers.
/// Si tous les scores bruts sont égaux (à FLAT_TOLERANCE près), tout vaut 0.
pub fn compute_scores(features: &Features, weights: &Weights) -> ScoreTable {
    let raw: Vec<f64> = normalized_signals(features)
        .iter()
        .map(|s| s.weighted(weights))
        .collect();

    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let scores = if range > FLAT_TOLERANCE {
        raw.iter().map(|&r| (r - min) / range).collect()
    } else {
        tracing::debug!("scores bruts tous égaux, scores mis à zéro");
        vec![0.0; raw.len()]
    };

    ScoreTable { scores }
}

/// Entrée du classement transmise au rapport.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberScore {
    pub number: u8,
    pub score: f64,
    pub frequency: u32,
}

pub fn top_scores(scores: &ScoreTable, features: &Features, n: usize) -> Vec<NumberScore> {
    scores
        .ranked()
        .into_iter()
        .take(n)
        .map(|number| NumberScore {
            number,
            score: scores.score(number),
            frequency: features.frequency(number),
        })
        .collect()
}
