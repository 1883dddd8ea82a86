//! alzgen-risk — Genotype-aware lifetime risk scoring and gene–drug
//! interaction analysis.
//!
//! Data flow: genotype → [`features::build_vector`] → [`classifier::RiskClassifier`]
//! → [`scorer::RiskScorer`]. [`interactions::InteractionAnalyzer`] reads the
//! same drug rules independently.

pub mod features;
pub mod classifier;
pub mod scorer;
pub mod interactions;

pub use classifier::{
    ClassifierArtifact, FixedProbabilityClassifier, LogisticRiskClassifier, ModelMetrics,
    PlattCalibration, RiskClassifier,
};
pub use features::{build_vector, FeatureVector};
pub use interactions::{InteractionAnalyzer, InteractionResult};
pub use scorer::{categorize, RiskCategory, RiskScore, RiskScorer, RISK_CAP_PERCENT};
