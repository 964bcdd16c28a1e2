//! High-level optimization entry point.
//!
//! Wires the room template, classifier, fitness weights, and GA engine into
//! a single run: validate, load the classifier once, evolve for the
//! configured generation budget, and hand back the best layout with its
//! fitness trajectory.

use crate::classifier::load_or_neutral;
use crate::error::Result;
use crate::features::FeatureConfig;
use crate::fitness::FitnessWeights;
use crate::ga::{GaConfig, GaProblem, GaRunner};
use crate::layout::LayoutProblem;
use crate::result::OptimizeResult;
use crate::room::Room;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Furniture layout optimizer.
///
/// # Example
///
/// ```
/// use roomfit::{FurnitureItem, GaConfig, LayoutOptimizer, Room};
///
/// let room = Room::new(300.0, 300.0)
///     .with_furniture(FurnitureItem::new("table", "table", 100.0, 100.0));
///
/// let config = GaConfig::new()
///     .with_population_size(20)
///     .with_max_generations(10)
///     .with_seed(42);
///
/// let result = LayoutOptimizer::new(room, config).optimize().unwrap();
/// assert_eq!(result.placements.len(), 1);
/// ```
pub struct LayoutOptimizer {
    room: Room,
    ga_config: GaConfig,
    weights: FitnessWeights,
    feature_cfg: FeatureConfig,
    classifier_path: Option<PathBuf>,
    cancelled: Arc<AtomicBool>,
}

impl LayoutOptimizer {
    /// Creates an optimizer for the given room and GA configuration.
    pub fn new(room: Room, ga_config: GaConfig) -> Self {
        Self {
            room,
            ga_config,
            weights: FitnessWeights::default(),
            feature_cfg: FeatureConfig::default(),
            classifier_path: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overrides the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Overrides the feature extraction configuration.
    pub fn with_feature_config(mut self, cfg: FeatureConfig) -> Self {
        self.feature_cfg = cfg;
        self
    }

    /// Sets the path of the pretrained classifier artifact. Without a path,
    /// or when loading fails, the classifier term is fixed at the neutral
    /// score.
    pub fn with_classifier_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.classifier_path = Some(path.into());
        self
    }

    /// Returns a handle that cancels the run at the next generation
    /// boundary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Runs the optimization to the configured generation budget.
    ///
    /// Fails fast on invalid configuration; classifier problems degrade to
    /// neutral scoring instead of failing. No side effects beyond the
    /// one-time classifier load.
    pub fn optimize(self) -> Result<OptimizeResult> {
        self.room.validate()?;
        self.ga_config.validate()?;

        if self.room.is_infeasible() {
            log::warn!(
                "furniture footprint {:.1} exceeds room area {:.1}; best layout will be imperfect",
                self.room.footprint_area(),
                self.room.area()
            );
        }

        let (classifier, degraded) = load_or_neutral(self.classifier_path.as_deref());

        let problem = LayoutProblem::new(
            self.room,
            self.weights,
            self.feature_cfg,
            classifier,
            self.ga_config.mutation_rate,
        );

        let runner = GaRunner::with_cancel(self.ga_config, problem, self.cancelled);
        let ga_result = runner.run();

        // The runner only hands back evaluated individuals, but guard the
        // degenerate zero-generation cancellation path.
        let report = match ga_result.best.report() {
            Some(report) => report.clone(),
            None => {
                let mut best = ga_result.best.clone();
                runner.problem().evaluate(&mut best);
                best.report().cloned().ok_or_else(|| {
                    crate::error::Error::InvalidConfiguration(
                        "best layout could not be evaluated".into(),
                    )
                })?
            }
        };

        Ok(OptimizeResult {
            placements: ga_result.best.placements().to_vec(),
            report,
            history: ga_result.history,
            generations: ga_result.generations,
            elapsed_ms: ga_result.elapsed.as_millis() as u64,
            degraded_classifier: degraded,
            cancelled: ga_result.cancelled,
        })
    }
}
