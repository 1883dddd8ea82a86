//! Immutable reference data, loaded once at startup.

use std::sync::Arc;

use alzgen_common::{AgeBaselineTable, DrugRuleTable, GeneEffectTable, Result};

use crate::config::ReferenceConfig;

/// The three reference tables, each behind an `Arc` so scorers and
/// analyzers can hold them without copying.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub gene_effects: Arc<GeneEffectTable>,
    pub age_baselines: Arc<AgeBaselineTable>,
    pub drug_rules: Arc<DrugRuleTable>,
}

impl ReferenceData {
    /// Load every table named by `config`. Any failure is a configuration
    /// error and should stop the process.
    pub fn load(config: &ReferenceConfig) -> Result<Self> {
        let gene_effects = match &config.gene_effects {
            Some(path) => GeneEffectTable::reference().merged_with(GeneEffectTable::from_path(path)?),
            None => GeneEffectTable::reference(),
        };
        let age_baselines = match &config.age_baselines {
            Some(path) => AgeBaselineTable::from_path(path)?,
            None => AgeBaselineTable::reference(),
        };
        let drug_rules = DrugRuleTable::from_path(&config.drug_rules)?;
        if drug_rules.is_empty() {
            tracing::warn!(
                path = %config.drug_rules.display(),
                "drug rule table is empty; no interactions will be reported"
            );
        }

        Ok(Self::new(gene_effects, age_baselines, drug_rules))
    }

    pub fn new(
        gene_effects: GeneEffectTable,
        age_baselines: AgeBaselineTable,
        drug_rules: DrugRuleTable,
    ) -> Self {
        Self {
            gene_effects: Arc::new(gene_effects),
            age_baselines: Arc::new(age_baselines),
            drug_rules: Arc::new(drug_rules),
        }
    }
}
