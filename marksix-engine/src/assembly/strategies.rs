use crate::features::{Features, PairMatrix};

use super::RangeBucket;
use crate::config::SET_SIZE;

/// A : les 6 premiers du pool, plus le premier numéro en retard du pool,
/// ou à défaut le 7e du pool. `pool` est trié par rang décroissant ; la liste
/// renvoyée n'est garantie ni complète ni sans doublon.
pub fn conservative(pool: &[u8], features: &Features) -> Vec<u8> {
    let mut picks: Vec<u8> = pool.iter().take(6).copied().collect();
    let extra = pool
        .iter()
        .copied()
        .find(|&n| features.bundle(n).overdue)
        .or_else(|| pool.get(6).copied());
    picks.extend(extra);
    picks
}

/// B : le meilleur de chaque tranche non vide, puis complément par rang.
pub fn spread(pool: &[u8]) -> Vec<u8> {
    let mut picks: Vec<u8> = RangeBucket::ALL
        .iter()
        .filter_map(|&bucket| pool.iter().copied().find(|&n| RangeBucket::of(n) == bucket))
        .collect();
    for &n in pool {
        if picks.len() >= SET_SIZE {
            break;
        }
        if !picks.contains(&n) {
            picks.push(n);
        }
    }
    picks
}

/// C : les 4 premiers, plus les 3 membres restants les plus liés à eux
/// (somme des co-occurrences décroissante, puis numéro croissant).
pub fn exploratory(pool: &[u8], pairs: &PairMatrix) -> Vec<u8> {
    let anchors: Vec<u8> = pool.iter().take(4).copied().collect();
    let mut others: Vec<(u8, u32)> = pool
        .iter()
        .copied()
        .filter(|n| !anchors.contains(n))
        .map(|n| (n, anchors.iter().map(|&a| pairs.get(n, a)).sum()))
        .collect();
    others.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    anchors
        .iter()
        .copied()
        .chain(others.into_iter().take(SET_SIZE - 4).map(|(n, _)| n))
        .collect()
}
