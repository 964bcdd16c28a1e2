//! Optimization run results.

use crate::fitness::FitnessReport;
use crate::ga::GenerationStats;
use crate::room::Placement;
use serde::{Deserialize, Serialize};

/// Outcome of one optimization run.
///
/// Contains everything the caller (UI / visualization layer) needs: the best
/// layout's placements, its fitness breakdown, and the generation-by-
/// generation fitness trajectory for progress display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Best layout found, index-aligned with the room's furniture list.
    pub placements: Vec<Placement>,
    /// Fitness breakdown of the best layout.
    pub report: FitnessReport,
    /// Per-generation best/average fitness, in generation order.
    pub history: Vec<GenerationStats>,
    /// Generations actually executed.
    pub generations: u32,
    /// Wall-clock time of the run in milliseconds.
    pub elapsed_ms: u64,
    /// True when the classifier artifact could not be used and the
    /// classifier term was fixed at the neutral score.
    pub degraded_classifier: bool,
    /// True when the run was cancelled before its generation budget.
    pub cancelled: bool,
}

impl OptimizeResult {
    /// Combined fitness of the best layout.
    pub fn best_fitness(&self) -> f64 {
        self.report.combined
    }

    /// True when the best layout has no furniture-furniture or
    /// furniture-fixed overlap.
    pub fn is_overlap_free(&self) -> bool {
        self.report.overlap_penalty == 0.0
    }

    /// True when the best layout lies fully inside the room.
    pub fn is_in_bounds(&self) -> bool {
        self.report.out_of_bounds_penalty == 0.0
    }

    /// Best fitness per generation, for plotting.
    pub fn best_fitness_history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().map(|s| s.best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(overlap_penalty: f64, out_of_bounds_penalty: f64) -> FitnessReport {
        FitnessReport {
            overlap_penalty,
            out_of_bounds_penalty,
            wall_reward: 20.0,
            walkability_reward: 15.0,
            utilization_reward: 10.0,
            classifier_score: 0.5,
            classifier_term: 7.5,
            combined: overlap_penalty + out_of_bounds_penalty + 52.5,
        }
    }

    #[test]
    fn test_overlap_free_flags() {
        let result = OptimizeResult {
            placements: Vec::new(),
            report: sample_report(0.0, 0.0),
            history: Vec::new(),
            generations: 10,
            elapsed_ms: 5,
            degraded_classifier: false,
            cancelled: false,
        };
        assert!(result.is_overlap_free());
        assert!(result.is_in_bounds());
        assert!((result.best_fitness() - 52.5).abs() < 1e-9);
    }

    #[test]
    fn test_penalized_result_flags() {
        let result = OptimizeResult {
            placements: Vec::new(),
            report: sample_report(-100.0, -50.0),
            history: vec![
                GenerationStats { best: 1.0, avg: 0.5 },
                GenerationStats { best: 2.0, avg: 1.0 },
            ],
            generations: 2,
            elapsed_ms: 1,
            degraded_classifier: true,
            cancelled: false,
        };
        assert!(!result.is_overlap_free());
        assert!(!result.is_in_bounds());
        let bests: Vec<f64> = result.best_fitness_history().collect();
        assert_eq!(bests, vec![1.0, 2.0]);
    }
}
