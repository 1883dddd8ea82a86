//! AlzGen — Alzheimer's lifetime risk assessment.
//! Entry point for the `alzgen` binary.

mod cli;
mod engine;
mod patient;
mod summary;

use std::sync::Arc;

use alzgen_config::Config;
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::engine::Engine;
use crate::patient::PatientRecord;

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("alzgen=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("AlzGen {} starting", env!("CARGO_PKG_VERSION"));
    let config = load_config(&cli).context("configuration is not usable; refusing to start")?;

    match cli.command {
        Command::Assess { input, json } => {
            let engine = Engine::init(&config)?;
            let patient = PatientRecord::from_path(&input)?;
            info!(
                genes = patient.genotype.len(),
                medications = patient.medications.len(),
                "assessing patient"
            );
            let assessment = engine.assess(&patient)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print!("{}", summary::render(&assessment));
            }
        }

        Command::Batch { input } => {
            let engine = Arc::new(Engine::init(&config)?);
            let patients = PatientRecord::batch_from_path(&input)?;
            info!(patients = patients.len(), "assessing batch");

            let outcomes = engine.assess_batch(patients).await?;

            let mut rejected = 0usize;
            for (id, outcome) in outcomes {
                let line = match outcome {
                    Ok(assessment) => serde_json::to_value(&assessment)?,
                    Err(e) => {
                        tracing::warn!(patient = %id, "rejected: {e}");
                        rejected += 1;
                        serde_json::json!({ "patient_id": id, "error": e.to_string() })
                    }
                };
                println!("{line}");
            }
            info!(rejected, "batch complete");
        }

        Command::Train { output } => {
            let reference = alzgen_config::ReferenceData::load(&config.reference)?;
            let model_path = output.unwrap_or_else(|| config.model.path.clone());
            let report = alzgen_train::run(&reference.gene_effects, &config.training, &model_path)?;
            if let Some(m) = &report.artifact.metrics {
                println!(
                    "Model {} written to {}\n  accuracy {:.3}  sensitivity {:.3}  specificity {:.3}  AUC {:.3}  Brier {:.3}",
                    report.artifact.model_id,
                    report.artifact_path.display(),
                    m.accuracy, m.sensitivity, m.specificity, m.auc, m.brier
                );
            }
            println!("Metrics written to {}", report.metrics_path.display());
        }

        Command::Medications => {
            let reference = alzgen_config::ReferenceData::load(&config.reference)?;
            for med in reference.drug_rules.known_medications() {
                println!("{med}");
            }
        }
    }

    Ok(())
}
