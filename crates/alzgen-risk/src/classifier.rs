//! Trait for the probabilistic risk classifier, plus the production
//! logistic model and a fixed-output stub.
//!
//! The scorer only needs `predict_probability`. How a model was trained
//! is the business of the offline pipeline in `alzgen-train`; at runtime
//! a classifier is only ever loaded, never fitted.

use std::path::Path;

use alzgen_common::{AlzgenError, GeneId, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::FeatureVector;

/// Calibrated probability of the elevated-risk class.
///
/// Implementations must be safe to call from many threads at once.
pub trait RiskClassifier: Send + Sync {
    /// Returns a probability in [0, 1].
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

// ── Artifact ────────────────────────────────────────────────────────────────

/// Artifact schema version understood by this build.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Platt scaling applied to the raw logit: p = σ(slope · z + offset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattCalibration {
    pub slope: f64,
    pub offset: f64,
}

impl Default for PlattCalibration {
    fn default() -> Self {
        Self { slope: 1.0, offset: 0.0 }
    }
}

impl PlattCalibration {
    pub fn apply(&self, logit: f64) -> f64 {
        sigmoid(self.slope * logit + self.offset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
}

/// Held-out evaluation recorded when the artifact was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub auc: f64,
    pub brier: f64,
    pub confusion: ConfusionMatrix,
    pub test_size: usize,
}

/// Persisted form of a trained, calibrated logistic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub format_version: u32,
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    /// Must equal the canonical gene order.
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub calibration: PlattCalibration,
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
}

impl ClassifierArtifact {
    /// A fresh artifact for the canonical feature order.
    pub fn new(
        weights: [f64; GeneId::COUNT],
        intercept: f64,
        calibration: PlattCalibration,
        metrics: Option<ModelMetrics>,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            feature_names: GeneId::ALL.iter().map(|g| g.as_str().to_string()).collect(),
            weights: weights.to_vec(),
            intercept,
            calibration,
            metrics,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(AlzgenError::config(format!(
                "unsupported classifier artifact version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        let expected: Vec<&str> = GeneId::ALL.iter().map(|g| g.as_str()).collect();
        if self.feature_names != expected {
            return Err(AlzgenError::config(format!(
                "classifier features {:?} do not match canonical order {:?}",
                self.feature_names, expected
            )));
        }
        if self.weights.len() != GeneId::COUNT {
            return Err(AlzgenError::config(format!(
                "classifier has {} weights, expected {}",
                self.weights.len(),
                GeneId::COUNT
            )));
        }
        let params = self
            .weights
            .iter()
            .chain([&self.intercept, &self.calibration.slope, &self.calibration.offset]);
        if params.into_iter().any(|p| !p.is_finite()) {
            return Err(AlzgenError::config("classifier parameters must be finite"));
        }
        Ok(())
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

// ── Logistic model ──────────────────────────────────────────────────────────

/// Calibrated multivariate logistic regression over the gene feature vector.
#[derive(Debug, Clone)]
pub struct LogisticRiskClassifier {
    model_id: Uuid,
    weights: [f64; GeneId::COUNT],
    intercept: f64,
    calibration: PlattCalibration,
}

impl LogisticRiskClassifier {
    /// Load a persisted artifact. Missing or malformed files are
    /// configuration errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AlzgenError::config(format!(
                "cannot read classifier artifact {}: {e}. Run `alzgen train` to produce one.",
                path.display()
            ))
        })?;
        let artifact: ClassifierArtifact = serde_json::from_str(&content).map_err(|e| {
            AlzgenError::config(format!("malformed classifier artifact {}: {e}", path.display()))
        })?;
        let classifier = Self::from_artifact(&artifact)?;
        tracing::info!(
            path = %path.display(),
            model_id = %artifact.model_id,
            trained_at = %artifact.trained_at,
            "loaded risk classifier"
        );
        Ok(classifier)
    }

    pub fn from_artifact(artifact: &ClassifierArtifact) -> Result<Self> {
        artifact.validate()?;
        let mut weights = [0.0; GeneId::COUNT];
        weights.copy_from_slice(&artifact.weights);
        Ok(Self {
            model_id: artifact.model_id,
            weights,
            intercept: artifact.intercept,
            calibration: artifact.calibration,
        })
    }

    pub fn model_id(&self) -> Uuid {
        self.model_id
    }

    /// Uncalibrated log-odds w·x + b.
    pub fn logit(&self, features: &FeatureVector) -> f64 {
        features
            .as_array()
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }
}

impl RiskClassifier for LogisticRiskClassifier {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        self.calibration.apply(self.logit(features))
    }
}

// ── Stub for testing ────────────────────────────────────────────────────────

/// Returns the same probability for every input.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbabilityClassifier {
    probability: f64,
}

impl FixedProbabilityClassifier {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl RiskClassifier for FixedProbabilityClassifier {
    fn predict_probability(&self, _features: &FeatureVector) -> f64 {
        self.probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn artifact() -> ClassifierArtifact {
        let mut weights = [0.0; GeneId::COUNT];
        weights[GeneId::Apoe.index()] = 1.0;
        ClassifierArtifact::new(weights, -1.0, PlattCalibration::default(), None)
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(40.0) <= 1.0);
        assert!(sigmoid(-40.0) >= 0.0);
    }

    #[test]
    fn test_logistic_prediction() {
        let clf = LogisticRiskClassifier::from_artifact(&artifact()).unwrap();
        let mut values = [0.0; GeneId::COUNT];
        values[GeneId::Apoe.index()] = 1.0;
        // logit = 1.0 * 1.0 - 1.0 = 0 → 0.5
        let p = clf.predict_probability(&FeatureVector::new(values));
        assert!((p - 0.5).abs() < 1e-12);
        assert!(clf.predict_probability(&FeatureVector::zeros()) < 0.5);
    }

    #[test]
    fn test_calibration_shifts_probability() {
        let mut a = artifact();
        a.calibration = PlattCalibration { slope: 1.0, offset: 2.0 };
        let clf = LogisticRiskClassifier::from_artifact(&a).unwrap();
        let mut values = [0.0; GeneId::COUNT];
        values[GeneId::Apoe.index()] = 1.0;
        let p = clf.predict_probability(&FeatureVector::new(values));
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_feature_order_rejected() {
        let mut a = artifact();
        a.feature_names.swap(0, 1);
        let err = LogisticRiskClassifier::from_artifact(&a).unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut a = artifact();
        a.format_version = 99;
        assert!(LogisticRiskClassifier::from_artifact(&a).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("risk_model.json");
        let a = artifact();
        a.save(&path).unwrap();
        let clf = LogisticRiskClassifier::load(&path).unwrap();
        assert_eq!(clf.model_id(), a.model_id);
    }

    #[test]
    fn test_missing_artifact_is_configuration_error() {
        let err = LogisticRiskClassifier::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }

    #[test]
    fn test_fixed_classifier_is_deterministic() {
        let clf = FixedProbabilityClassifier::new(0.7);
        assert_eq!(clf.predict_probability(&FeatureVector::zeros()), 0.7);
        assert_eq!(clf.predict_probability(&FeatureVector::zeros()), 0.7);
    }
}
