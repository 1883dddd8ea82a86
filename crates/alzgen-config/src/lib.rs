//! alzgen-config — Process configuration and one-shot reference data loading.
//! Reads alzgen.toml from the current directory or the path in ALZGEN_CONFIG.

mod config;
mod reference;

pub use config::{Config, ModelConfig, ReferenceConfig, TrainingConfig, CONFIG_ENV_VAR};
pub use reference::ReferenceData;
