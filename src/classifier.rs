//! Validity classifier contract and implementations.
//!
//! The engine only depends on the [`ValidityClassifier`] contract: any model
//! that maps a feature vector to a probability in `[0, 1]` can serve as the
//! classifier term of the fitness function. The shipped implementation is a
//! logistic model loaded from a JSON artifact trained offline; when no
//! usable artifact is available the engine falls back to a neutral score so
//! optimization proceeds without the classifier.

use crate::error::{Error, Result};
use crate::features::FEATURE_LEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Neutral probability substituted when no classifier is available.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Contract for validity models.
///
/// Implementations must be safe to call concurrently; the classifier is
/// loaded once per run and shared read-only across all fitness evaluations.
pub trait ValidityClassifier: Send + Sync {
    /// Probability in `[0, 1]` that the layout described by `features` is
    /// valid.
    ///
    /// Fails with [`Error::ClassifierUnavailable`] on a feature-length
    /// mismatch.
    fn predict_probability(&self, features: &[f64]) -> Result<f64>;
}

/// Logistic regression model over the layout feature vector.
///
/// Artifact format: `{"feature_len": n, "weights": [...], "bias": b}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Expected feature vector length.
    pub feature_len: usize,
    /// Per-feature weights.
    pub weights: Vec<f64>,
    /// Bias term.
    pub bias: f64,
}

impl LogisticModel {
    /// Loads a model from a JSON artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::ClassifierUnavailable(format!("cannot read model {}: {}", path.display(), e))
        })?;
        let model: LogisticModel = serde_json::from_str(&raw).map_err(|e| {
            Error::ClassifierUnavailable(format!("cannot parse model {}: {}", path.display(), e))
        })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.len() != self.feature_len {
            return Err(Error::ClassifierUnavailable(format!(
                "model declares {} features but has {} weights",
                self.feature_len,
                self.weights.len()
            )));
        }
        if self.feature_len != FEATURE_LEN {
            return Err(Error::ClassifierUnavailable(format!(
                "model expects {} features, engine produces {}",
                self.feature_len, FEATURE_LEN
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::ClassifierUnavailable(
                "model contains non-finite weights".into(),
            ));
        }
        Ok(())
    }
}

impl ValidityClassifier for LogisticModel {
    fn predict_probability(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.feature_len {
            return Err(Error::ClassifierUnavailable(format!(
                "feature vector length {} does not match model input {}",
                features.len(),
                self.feature_len
            )));
        }

        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

/// Classifier stand-in returning the fixed neutral score.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralClassifier;

impl ValidityClassifier for NeutralClassifier {
    fn predict_probability(&self, _features: &[f64]) -> Result<f64> {
        Ok(NEUTRAL_SCORE)
    }
}

/// Loads the classifier artifact, falling back to [`NeutralClassifier`] on
/// failure.
///
/// Returns the classifier and whether the engine is running degraded
/// (classifier term fixed at [`NEUTRAL_SCORE`]).
pub fn load_or_neutral(path: Option<&Path>) -> (Box<dyn ValidityClassifier>, bool) {
    match path {
        Some(path) => match LogisticModel::load(path) {
            Ok(model) => (Box::new(model), false),
            Err(e) => {
                log::warn!("running without validity classifier: {}", e);
                (Box::new(NeutralClassifier), true)
            }
        },
        None => (Box::new(NeutralClassifier), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> LogisticModel {
        LogisticModel {
            feature_len: FEATURE_LEN,
            weights: vec![0.0; FEATURE_LEN],
            bias: 0.0,
        }
    }

    #[test]
    fn test_zero_model_predicts_half() {
        let model = sample_model();
        let p = model.predict_probability(&[1.0; FEATURE_LEN]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_in_unit_interval() {
        let mut model = sample_model();
        model.weights[0] = -3.0;
        model.bias = 2.0;

        let p = model.predict_probability(&[100.0; FEATURE_LEN]).unwrap();
        assert!((0.0..=1.0).contains(&p));

        let p = model.predict_probability(&[-100.0; FEATURE_LEN]).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_feature_length_mismatch() {
        let model = sample_model();
        let err = model.predict_probability(&[0.0; 3]).unwrap_err();
        assert!(matches!(err, Error::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let err = LogisticModel::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_load_round_trip() {
        let mut model = sample_model();
        model.weights[2] = 1.5;
        model.bias = -0.25;

        let path = std::env::temp_dir().join("roomfit_test_model.json");
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let loaded = LogisticModel::load(&path).unwrap();
        assert_eq!(loaded.weights, model.weights);
        assert_eq!(loaded.bias, model.bias);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_neutral_fallback() {
        let (classifier, degraded) =
            load_or_neutral(Some(Path::new("/definitely/not/here.json")));
        assert!(degraded);
        let p = classifier.predict_probability(&[0.0; FEATURE_LEN]).unwrap();
        assert_eq!(p, NEUTRAL_SCORE);
    }
}
