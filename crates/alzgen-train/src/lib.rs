//! alzgen-train — Offline pipeline that produces the classifier artifact.
//!
//! Never called from the scoring path. Steps:
//! 1. Draw a seeded synthetic cohort
//! 2. Split train / calibration / test
//! 3. Fit logistic regression, then Platt-calibrate
//! 4. Evaluate on the test split
//! 5. Persist artifact and metrics

pub mod cohort;
pub mod logistic;
pub mod metrics;
pub mod pipeline;

pub use pipeline::{run, train, TrainingReport};
