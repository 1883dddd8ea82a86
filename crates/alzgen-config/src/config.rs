use std::path::{Path, PathBuf};

use alzgen_common::{AlzgenError, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "ALZGEN_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Medication–gene interaction rules (JSON or YAML).
    #[serde(default = "default_drug_rules")]
    pub drug_rules: PathBuf,
    /// Overrides the built-in gene effect table when set.
    #[serde(default)]
    pub gene_effects: Option<PathBuf>,
    /// Overrides the built-in age baselines when set.
    #[serde(default)]
    pub age_baselines: Option<PathBuf>,
}

fn default_drug_rules() -> PathBuf { PathBuf::from("data/drug_interactions.json") }

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            drug_rules: default_drug_rules(),
            gene_effects: None,
            age_baselines: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Classifier artifact produced by `alzgen train`.
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_model_path() -> PathBuf { PathBuf::from("models/risk_model.json") }

impl Default for ModelConfig {
    fn default() -> Self {
        Self { path: default_model_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_cohort_size")]
    pub cohort_size: usize,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Share of the training split held back for Platt calibration.
    #[serde(default = "default_calibration_fraction")]
    pub calibration_fraction: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: PathBuf,
}

fn default_cohort_size()          -> usize   { 1000 }
fn default_test_fraction()        -> f64     { 0.3 }
fn default_calibration_fraction() -> f64     { 0.2 }
fn default_seed()                 -> u64     { 42 }
fn default_learning_rate()        -> f64     { 0.5 }
fn default_epochs()               -> usize   { 500 }
fn default_metrics_dir()          -> PathBuf { PathBuf::from("models/metrics") }

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            cohort_size: default_cohort_size(),
            test_fraction: default_test_fraction(),
            calibration_fraction: default_calibration_fraction(),
            seed: default_seed(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
            metrics_dir: default_metrics_dir(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cohort_size < 10 {
            return Err(AlzgenError::config("training.cohort_size must be at least 10"));
        }
        if !(0.0..1.0).contains(&self.test_fraction) || self.test_fraction == 0.0 {
            return Err(AlzgenError::config("training.test_fraction must be in (0, 1)"));
        }
        if !(0.0..1.0).contains(&self.calibration_fraction) || self.calibration_fraction == 0.0 {
            return Err(AlzgenError::config("training.calibration_fraction must be in (0, 1)"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(AlzgenError::config("training.learning_rate must be positive"));
        }
        if self.epochs == 0 {
            return Err(AlzgenError::config("training.epochs must be at least 1"));
        }
        self.split_sizes()?;
        Ok(())
    }

    /// Sizes of the (test, calibration, fit) splits of the cohort. Each
    /// split must hold at least one sample.
    pub fn split_sizes(&self) -> Result<(usize, usize, usize)> {
        let test = ((self.cohort_size as f64) * self.test_fraction).round() as usize;
        let rest = self.cohort_size.saturating_sub(test);
        let calibration = ((rest as f64) * self.calibration_fraction).round() as usize;
        let fit = rest.saturating_sub(calibration);
        if test == 0 || calibration == 0 || fit == 0 {
            return Err(AlzgenError::config(format!(
                "training.cohort_size {} with test_fraction {} and calibration_fraction {} \
                 leaves an empty split (test {test}, calibration {calibration}, fit {fit})",
                self.cohort_size, self.test_fraction, self.calibration_fraction
            )));
        }
        Ok((test, calibration, fit))
    }
}

impl Config {
    /// Load configuration from alzgen.toml.
    /// Checks ALZGEN_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .unwrap_or_else(|_| "alzgen.toml".to_string());
        Self::from_path(Path::new(&path))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AlzgenError::config(format!(
                "config file not found: {}. Copy alzgen.example.toml to alzgen.toml and edit it.",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AlzgenError::config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| AlzgenError::config(format!("malformed alzgen.toml: {e}")))?;
        config.training.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.reference.drug_rules, PathBuf::from("data/drug_interactions.json"));
        assert!(config.reference.gene_effects.is_none());
        assert_eq!(config.model.path, PathBuf::from("models/risk_model.json"));
        assert_eq!(config.training.seed, 42);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = Config::from_toml_str(
            "[reference]\nage_baselines = \"data/baselines.yaml\"\n\n[training]\nepochs = 50\n",
        )
        .unwrap();
        assert_eq!(config.reference.age_baselines, Some(PathBuf::from("data/baselines.yaml")));
        assert_eq!(config.training.epochs, 50);
        assert_eq!(config.training.cohort_size, 1000);
    }

    #[test]
    fn test_bad_test_fraction_rejected() {
        let err = Config::from_toml_str("[training]\ntest_fraction = 1.5\n").unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }

    #[test]
    fn test_split_sizes_for_defaults() {
        assert_eq!(TrainingConfig::default().split_sizes().unwrap(), (300, 140, 560));
    }

    #[test]
    fn test_fraction_leaving_empty_split_rejected() {
        let config = TrainingConfig {
            cohort_size: 10,
            test_fraction: 0.95,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));

        let config = TrainingConfig {
            cohort_size: 10,
            calibration_fraction: 0.05,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let err = Config::from_toml_str("[model\npath = 3").unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = Config::from_path(Path::new("/nonexistent/alzgen.toml")).unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }
}
