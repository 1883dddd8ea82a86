use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "alzgen", version, about = "Genotype-aware Alzheimer's lifetime risk assessment")]
pub struct Cli {
    /// Path to alzgen.toml (defaults to $ALZGEN_CONFIG, then ./alzgen.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess one patient from a JSON document
    Assess {
        /// Patient JSON: {"id", "age_group", "genotype", "medications"}
        #[arg(long)]
        input: PathBuf,
        /// Print the machine-readable assessment instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Assess a JSON array of patients, one JSON line per patient
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
    /// Train, calibrate and evaluate the risk classifier offline
    Train {
        /// Artifact path (defaults to model.path from the config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List medications that have interaction rules
    Medications,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assess() {
        let cli = Cli::try_parse_from(["alzgen", "assess", "--input", "p.json", "--json"]).unwrap();
        match cli.command {
            Command::Assess { input, json } => {
                assert_eq!(input, PathBuf::from("p.json"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["alzgen", "train", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Command::Train { output: None }));
    }

    #[test]
    fn test_assess_requires_input() {
        assert!(Cli::try_parse_from(["alzgen", "assess"]).is_err());
    }
}
