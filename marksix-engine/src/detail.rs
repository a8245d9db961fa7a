use marksix_data::models::{DrawHistory, MAX_NUMBER};

use crate::features::Features;
use crate::scoring::ScoreTable;

const MAX_PARTNERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub number: u8,
    pub joint: u32,
    pub frequency: u32,
}

/// Vue détaillée d'un numéro.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberDetail {
    pub number: u8,
    pub score: f64,
    pub frequency: u32,
    pub recency: f64,
    pub overdue: bool,
    pub last_digit_score: u32,
    /// Jusqu'à 10 partenaires, co-occurrence décroissante puis numéro croissant.
    pub top_partners: Vec<Partner>,
    /// Présence dans chaque tirage, du plus ancien au plus récent.
    pub timeline: Vec<bool>,
}

/// `None` si `number` est hors de l'univers.
pub fn number_detail(
    history: &DrawHistory,
    features: &Features,
    scores: &ScoreTable,
    number: u8,
) -> Option<NumberDetail> {
    if number < 1 || number > MAX_NUMBER {
        return None;
    }
    let bundle = features.bundle(number);

    let mut partners: Vec<Partner> = features
        .pairs
        .partners(number)
        .into_iter()
        .map(|(m, joint)| Partner { number: m, joint, frequency: features.frequency(m) })
        .collect();
    partners.sort_by(|a, b| b.joint.cmp(&a.joint).then(a.number.cmp(&b.number)));
    partners.truncate(MAX_PARTNERS);

    Some(NumberDetail {
        number,
        score: scores.score(number),
        frequency: bundle.frequency,
        recency: bundle.recency,
        overdue: bundle.overdue,
        last_digit_score: bundle.last_digit_score,
        top_partners: partners,
        timeline: history.iter().map(|d| d.contains(number)).collect(),
    })
}

/// Apparitions cumulées par dernier chiffre (0-9).
pub fn last_digit_distribution(features: &Features) -> Vec<(u8, u32)> {
    (0u8..10).zip(features.last_digit.iter().copied()).collect()
}
