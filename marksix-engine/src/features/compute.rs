use marksix_data::models::{universe, DrawHistory};

use super::{FeatureBundle, Features, PairMatrix, SIDE};

/// Extrait les signaux de chaque numéro de l'univers.
/// L'historique est ordonné du plus ancien au plus récent : le tirage en position `i`
/// a un âge `total - i`, et contribue `exp(-decay * (age - 1))` à la récence.
pub fn extract_features(history: &DrawHistory, decay: f64) -> Features {
    let total = history.len();
    let mut frequency = [0u32; SIDE];
    let mut recency = [0.0f64; SIDE];
    let mut pairs = PairMatrix::default();

    for (i, draw) in history.iter().enumerate() {
        let age = (total - i) as f64;
        let weight = (-decay * (age - 1.0)).exp();
        let numbers = draw.numbers();
        for (k, &n) in numbers.iter().enumerate() {
            frequency[n as usize] += 1;
            recency[n as usize] += weight;
            for &m in &numbers[k + 1..] {
                pairs.record(n, m);
            }
        }
    }

    let mut last_digit = [0u32; 10];
    for n in universe() {
        last_digit[(n % 10) as usize] += frequency[n as usize];
    }

    let bundles = universe()
        .map(|n| {
            let f = frequency[n as usize];
            FeatureBundle {
                number: n,
                frequency: f,
                recency: recency[n as usize],
                pair_score: pairs.row_sum(n),
                last_digit_score: last_digit[(n % 10) as usize],
                overdue: f == 0,
            }
        })
        .collect();

    let features = Features { bundles, pairs, last_digit };
    tracing::debug!(
        draws = total,
        max_frequency = features.max_frequency(),
        max_pair = features.pairs.max_row_sum(),
        "signaux extraits"
    );
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use marksix_data::feed::builtin_history;
    use marksix_data::models::{FeedOrder, RawDraw, MAX_NUMBER};

    fn history(rows: &[[u8; 7]]) -> DrawHistory {
        let raw = rows.iter().map(|r| RawDraw::new(r)).collect();
        DrawHistory::ingest(raw, FeedOrder::OldestFirst).unwrap()
    }

    #[test]
    fn test_bundle_per_number() {
        let features = extract_features(&builtin_history().unwrap(), 0.3);
        assert_eq!(features.bundles.len(), 49);
        for (i, b) in features.bundles.iter().enumerate() {
            assert_eq!(b.number as usize, i + 1);
        }
    }

    #[test]
    fn test_frequency_counts() {
        let features = extract_features(&builtin_history().unwrap(), 0.3);
        assert_eq!(features.frequency(39), 8);
        assert_eq!(features.frequency(42), 0);
        assert_eq!(features.max_frequency(), 8);
        let total: u32 = features.bundles.iter().map(|b| b.frequency).sum();
        assert_eq!(total, 23 * 7);
    }

    #[test]
    fn test_overdue_flag() {
        let features = extract_features(&builtin_history().unwrap(), 0.3);
        let overdue: Vec<u8> = features.bundles.iter().filter(|b| b.overdue).map(|b| b.number).collect();
        assert_eq!(overdue, vec![42]);
    }

    #[test]
    fn test_recency_favors_end_of_history() {
        let h = history(&[
            [1, 2, 3, 4, 5, 6, 7],
            [8, 9, 10, 11, 12, 13, 14],
        ]);
        let features = extract_features(&h, 0.3);
        // Dernier tirage : âge 1, poids exp(0) = 1.
        assert!((features.bundle(8).recency - 1.0).abs() < 1e-12);
        assert!((features.bundle(1).recency - (-0.3f64).exp()).abs() < 1e-12);
        assert!(features.bundle(8).recency > features.bundle(1).recency);
    }

    #[test]
    fn test_pair_matrix_symmetric() {
        let features = extract_features(&builtin_history().unwrap(), 0.3);
        for a in 1..=MAX_NUMBER {
            assert_eq!(features.pairs.get(a, a), 0);
            for b in 1..=MAX_NUMBER {
                assert_eq!(features.pairs.get(a, b), features.pairs.get(b, a), "({}, {})", a, b);
            }
        }
    }

    #[test]
    fn test_pair_score_is_six_per_appearance() {
        // Chaque apparition apporte 6 partenaires.
        let features = extract_features(&builtin_history().unwrap(), 0.3);
        for b in &features.bundles {
            assert_eq!(b.pair_score, b.frequency * 6, "numéro {}", b.number);
        }
        assert_eq!(features.pairs.max_row_sum(), 48);
    }

    #[test]
    fn test_pair_counts_joint_appearances() {
        let h = history(&[
            [1, 2, 3, 4, 5, 6, 7],
            [1, 2, 10, 11, 12, 13, 14],
        ]);
        let features = extract_features(&h, 0.3);
        assert_eq!(features.pairs.get(1, 2), 2);
        assert_eq!(features.pairs.get(2, 1), 2);
        assert_eq!(features.pairs.get(1, 10), 1);
        assert_eq!(features.pairs.get(3, 10), 0);
    }

    #[test]
    fn test_last_digit_includes_self() {
        let h = history(&[
            [1, 11, 21, 2, 3, 4, 5],
            [1, 31, 6, 7, 8, 9, 10],
        ]);
        let features = extract_features(&h, 0.3);
        // Classe 1 : 1 (x2), 11, 21, 31.
        assert_eq!(features.last_digit[1], 5);
        assert_eq!(features.bundle(41).last_digit_score, 5);
        assert_eq!(features.bundle(41).frequency, 0);
        assert_eq!(features.max_last_digit(), 5);
    }

    #[test]
    fn test_empty_history_all_zero() {
        let features = extract_features(&DrawHistory::default(), 0.3);
        assert_eq!(features.max_frequency(), 0);
        assert_eq!(features.total_recency(), 0.0);
        assert_eq!(features.pairs.max_row_sum(), 0);
        assert_eq!(features.max_last_digit(), 0);
        assert!(features.bundles.iter().all(|b| b.overdue));
    }
}
