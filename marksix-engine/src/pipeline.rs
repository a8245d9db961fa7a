use marksix_data::models::DrawHistory;

use crate::assembly::{assemble_all, Candidate};
use crate::config::{ConfigError, PipelineConfig};
use crate::features::{extract_features, Features};
use crate::pool::{select_pool, Pool};
use crate::scoring::{compute_scores, top_scores, NumberScore, ScoreTable};

/// Tout ce que le pipeline transmet au rapport.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub features: Features,
    pub scores: ScoreTable,
    pub pool: Pool,
    pub top_scores: Vec<NumberScore>,
    pub candidates: Vec<Candidate>,
}

/// Historique -> signaux -> scores -> pool -> grilles, en une seule passe.
pub fn run(history: &DrawHistory, config: &PipelineConfig) -> Result<Prediction, ConfigError> {
    config.validate()?;
    tracing::info!(draws = history.len(), pool_size = config.pool_size, "lancement du pipeline");

    let features = extract_features(history, config.recency_decay);
    let scores = compute_scores(&features, &config.weights);
    let pool = select_pool(&scores, config.pool_size);
    let top_scores = top_scores(&scores, &features, config.report_top);
    let candidates = assemble_all(&pool, &features, config.sum_window);

    tracing::info!(pool = ?pool.numbers(), "pipeline terminé");
    Ok(Prediction { features, scores, pool, top_scores, candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Strategy;
    use crate::config::Weights;
    use marksix_data::feed::builtin_history;

    #[test]
    fn test_fixture_top_number_in_top_four() {
        let prediction = run(&builtin_history().unwrap(), &PipelineConfig::default()).unwrap();
        assert!(prediction.pool.numbers()[..4].contains(&39));
        assert_eq!(prediction.pool.len(), 12);
        assert_eq!(prediction.top_scores.len(), 15);
        let strategies: Vec<Strategy> = prediction.candidates.iter().map(|c| c.strategy).collect();
        assert_eq!(strategies, Strategy::ALL.to_vec());
    }

    #[test]
    fn test_idempotent() {
        let history = builtin_history().unwrap();
        let config = PipelineConfig::default();
        let a = run(&history, &config).unwrap();
        let b = run(&history, &config).unwrap();
        assert_eq!(a, b);
        for ((_, x), (_, y)) in a.scores.iter().zip(b.scores.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_empty_history() {
        let prediction = run(&DrawHistory::default(), &PipelineConfig::default()).unwrap();
        assert_eq!(prediction.pool.numbers(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert!(prediction.top_scores.iter().all(|e| e.score == 0.0));
        for c in &prediction.candidates {
            assert!(c.set.is_complete());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig { pool_size: 3, ..PipelineConfig::default() };
        assert_eq!(
            run(&builtin_history().unwrap(), &config),
            Err(ConfigError::InvalidPoolSize { pool_size: 3 })
        );
    }

    #[test]
    fn test_custom_pool_and_report_size() {
        let config = PipelineConfig {
            pool_size: 20,
            report_top: 5,
            ..PipelineConfig::with_weights(Weights { recency: 0.6, ..Weights::default() })
        };
        let prediction = run(&builtin_history().unwrap(), &config).unwrap();
        assert_eq!(prediction.pool.len(), 20);
        assert_eq!(prediction.top_scores.len(), 5);
        for c in &prediction.candidates {
            assert!(c.set.is_complete());
            assert!(c.set.numbers().iter().all(|&n| prediction.pool.contains(n)));
        }
    }
}
