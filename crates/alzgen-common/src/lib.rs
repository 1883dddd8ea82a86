//! alzgen-common — Shared types, errors, and reference tables used across all AlzGen crates.

pub mod error;
pub mod genes;
pub mod age;
pub mod drug_rules;
pub mod document;

// Re-export commonly used types
pub use error::{AlzgenError, Result};
pub use genes::{GeneEffectTable, GeneId, GenotypeProfile};
pub use age::{AgeBaselineTable, AgeGroup};
pub use drug_rules::{DrugRuleTable, GeneRules};
