use crate::config::{SumWindow, SET_SIZE};

use super::CandidateSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Somme déjà dans la fenêtre.
    InWindow,
    /// Première substitution trouvée qui ramène la somme dans la fenêtre.
    Swapped { position: usize, removed: u8, added: u8 },
    /// Aucune substitution possible ; grille renvoyée telle quelle.
    OutOfWindow,
}

pub fn sum_of(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| n as u32).sum()
}

/// Garde la première occurrence de chaque numéro, puis tronque à 7.
pub fn dedup_truncate(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SET_SIZE);
    for &n in raw {
        if out.len() == SET_SIZE {
            break;
        }
        if !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Complète avec les membres du pool absents, par rang, jusqu'à 7 ou épuisement du pool.
pub fn backfill(candidate: &[u8], pool: &[u8]) -> Vec<u8> {
    let mut out = candidate.to_vec();
    for &n in pool {
        if out.len() >= SET_SIZE {
            break;
        }
        if !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Parcourt les positions dans l'ordre et, pour chacune, les membres du pool absents
/// de la grille ; la première substitution qui tombe dans la fenêtre est retenue.
pub fn repair_sum(candidate: &[u8], pool: &[u8], window: SumWindow) -> (Vec<u8>, RepairOutcome) {
    let sum = sum_of(candidate);
    if window.contains(sum) {
        return (candidate.to_vec(), RepairOutcome::InWindow);
    }

    for (position, &removed) in candidate.iter().enumerate() {
        for &added in pool {
            if candidate.contains(&added) {
                continue;
            }
            let new_sum = sum - removed as u32 + added as u32;
            if window.contains(new_sum) {
                let mut swapped = candidate.to_vec();
                swapped[position] = added;
                return (swapped, RepairOutcome::Swapped { position, removed, added });
            }
        }
    }

    (candidate.to_vec(), RepairOutcome::OutOfWindow)
}

/// Réparation complète d'une liste brute : dédoublonnage, complément depuis le pool,
/// puis au plus une substitution pour ramener la somme dans la fenêtre.
pub fn finalize(raw: &[u8], pool: &[u8], window: SumWindow) -> (CandidateSet, RepairOutcome) {
    let unique = dedup_truncate(raw);
    let filled = backfill(&unique, pool);
    let (repaired, outcome) = repair_sum(&filled, pool, window);
    (CandidateSet::from_unsorted(repaired), outcome)
}
