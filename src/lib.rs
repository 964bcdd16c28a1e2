//! # roomfit
//!
//! Genetic-algorithm layout optimization for rectangular furniture in a
//! single rectangular room.
//!
//! The engine searches for a non-overlapping, practical arrangement of
//! furniture items around immovable fixed elements (doors, windows, wall
//! segments). Fitness combines geometric penalties and rewards with the
//! probability from a pretrained validity classifier.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Rect`], [`Rotation`] and pure overlap/containment
//!   queries
//! - **Data model**: [`Room`], [`FurnitureItem`], [`FixedElement`],
//!   [`Placement`]
//! - **Feature extraction**: [`extract_features`] with a fixed-order vector
//!   shared with the classifier contract
//! - **Classifier**: [`ValidityClassifier`] contract, [`LogisticModel`]
//!   artifact, neutral fallback
//! - **Fitness**: [`evaluate`] producing a per-term [`FitnessReport`]
//! - **GA engine**: [`GaRunner`], [`GaProblem`], [`Individual`]
//! - **Entry point**: [`LayoutOptimizer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use roomfit::{FixedElement, FixedKind, FurnitureItem, GaConfig, LayoutOptimizer, Room};
//!
//! let room = Room::new(400.0, 300.0)
//!     .with_fixed_element(FixedElement::new(FixedKind::Door, 150.0, 0.0, 50.0, 10.0))
//!     .with_furniture(FurnitureItem::new("bed-1", "bed", 180.0, 120.0));
//!
//! let config = GaConfig::new()
//!     .with_population_size(30)
//!     .with_max_generations(50)
//!     .with_seed(42);
//!
//! let result = LayoutOptimizer::new(room, config).optimize().unwrap();
//!
//! println!(
//!     "best fitness {:.2} after {} generations",
//!     result.best_fitness(),
//!     result.generations
//! );
//! ```
//!
//! A single run is sequential across generations; fitness evaluation within
//! a generation runs in parallel. Runs are reproducible: a fixed
//! [`GaConfig::seed`] yields identical placements and fitness history.

pub mod classifier;
pub mod error;
pub mod features;
pub mod fitness;
pub mod ga;
pub mod geometry;
pub mod layout;
pub mod optimizer;
pub mod result;
pub mod room;

// Re-exports
pub use classifier::{
    load_or_neutral, LogisticModel, NeutralClassifier, ValidityClassifier, NEUTRAL_SCORE,
};
pub use error::{Error, Result};
pub use features::{extract_features, FeatureConfig, OccupancyGrid, FEATURE_LEN};
pub use fitness::{evaluate, FitnessReport, FitnessWeights};
pub use ga::{GaConfig, GaProblem, GaResult, GaRunner, GenerationStats, Individual};
pub use geometry::{
    contained_in, min_wall_distance, outside_area, overlap_area, overlaps, Rect, Rotation,
};
pub use layout::{Layout, LayoutProblem};
pub use optimizer::LayoutOptimizer;
pub use result::OptimizeResult;
pub use room::{FixedElement, FixedKind, FurnitureItem, Placement, Room};
