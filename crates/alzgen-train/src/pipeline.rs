use std::path::{Path, PathBuf};

use alzgen_common::GeneEffectTable;
use alzgen_config::TrainingConfig;
use alzgen_risk::ClassifierArtifact;
use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::cohort::{synthetic_cohort, Sample};
use crate::logistic::{fit_logistic, fit_platt};
use crate::metrics::evaluate;

/// File name of the metrics document inside `metrics_dir`.
pub const METRICS_FILE: &str = "evaluation_results.json";

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub artifact: ClassifierArtifact,
    pub artifact_path: PathBuf,
    pub metrics_path: PathBuf,
}

/// Draw, fit, calibrate and evaluate. Pure apart from the RNG, which is
/// seeded from `config.seed`.
pub fn train(table: &GeneEffectTable, config: &TrainingConfig) -> anyhow::Result<ClassifierArtifact> {
    config.validate()?;
    let (test_size, calibration_size, _) = config.split_sizes()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut cohort = synthetic_cohort(table, config.cohort_size, &mut rng);
    cohort.shuffle(&mut rng);

    let (test, rest): (&[Sample], &[Sample]) = cohort.split_at(test_size);
    let (calibration, fit_set) = rest.split_at(calibration_size);
    info!(
        train = fit_set.len(),
        calibration = calibration.len(),
        test = test.len(),
        "synthetic cohort drawn"
    );

    let fit = fit_logistic(fit_set, config.learning_rate, config.epochs);

    let cal_logits: Vec<f64> = calibration.iter().map(|s| fit.logit(s)).collect();
    let cal_labels: Vec<bool> = calibration.iter().map(|s| s.label).collect();
    let platt = fit_platt(&cal_logits, &cal_labels);

    let test_probs: Vec<f64> = test.iter().map(|s| platt.apply(fit.logit(s))).collect();
    let test_labels: Vec<bool> = test.iter().map(|s| s.label).collect();
    let metrics = evaluate(&test_probs, &test_labels);
    info!(
        accuracy = metrics.accuracy,
        sensitivity = metrics.sensitivity,
        specificity = metrics.specificity,
        auc = metrics.auc,
        brier = metrics.brier,
        "held-out evaluation"
    );

    let artifact = ClassifierArtifact::new(fit.weights, fit.intercept, platt, Some(metrics));
    artifact.validate()?;
    Ok(artifact)
}

/// Train and persist the artifact at `model_path` plus the metrics
/// document under `config.metrics_dir`.
pub fn run(
    table: &GeneEffectTable,
    config: &TrainingConfig,
    model_path: &Path,
) -> anyhow::Result<TrainingReport> {
    info!(cohort_size = config.cohort_size, seed = config.seed, "training risk classifier");
    let artifact = train(table, config)?;

    artifact
        .save(model_path)
        .with_context(|| format!("writing classifier artifact to {}", model_path.display()))?;

    std::fs::create_dir_all(&config.metrics_dir)
        .with_context(|| format!("creating {}", config.metrics_dir.display()))?;
    let metrics_path = config.metrics_dir.join(METRICS_FILE);
    let metrics_doc = serde_json::json!({
        "model_id": artifact.model_id,
        "trained_at": artifact.trained_at,
        "metrics": artifact.metrics,
    });
    std::fs::write(&metrics_path, serde_json::to_string_pretty(&metrics_doc)?)
        .with_context(|| format!("writing {}", metrics_path.display()))?;

    info!(
        model_id = %artifact.model_id,
        artifact = %model_path.display(),
        metrics = %metrics_path.display(),
        "classifier artifact written"
    );

    Ok(TrainingReport {
        artifact,
        artifact_path: model_path.to_path_buf(),
        metrics_path,
    })
}
