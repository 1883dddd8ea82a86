//! Patient input documents and the assessment returned for them.

use std::path::Path;

use alzgen_common::GenotypeProfile;
use alzgen_risk::{InteractionResult, RiskScore};
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub age_group: String,
    pub genotype: GenotypeProfile,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl PatientRecord {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading patient file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing patient file {}", path.display()))
    }

    pub fn batch_from_path(path: &Path) -> anyhow::Result<Vec<Self>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading batch file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing batch file {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub patient_id: String,
    pub age_group: String,
    pub risk: RiskScore,
    pub interactions: InteractionResult,
    pub action_plan: Vec<String>,
}

/// Adjusted risk above which imaging and trial referral are added.
pub const ELEVATED_RISK_PERCENT: f64 = 25.0;

pub fn action_plan(adjusted_risk_percent: f64) -> Vec<String> {
    let mut actions = vec![
        "Annual cognitive screening".to_string(),
        "MRI baseline at age 55".to_string(),
        "Cardiovascular risk management".to_string(),
        "Mediterranean diet counseling".to_string(),
    ];
    if adjusted_risk_percent > ELEVATED_RISK_PERCENT {
        actions.push("Consider amyloid PET scan".to_string());
        actions.push("Eligible for prevention trials".to_string());
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_plan_threshold_is_exclusive() {
        assert_eq!(action_plan(25.0).len(), 4);
        let elevated = action_plan(25.1);
        assert_eq!(elevated.len(), 6);
        assert_eq!(elevated[4], "Consider amyloid PET scan");
    }

    #[test]
    fn test_medications_default_to_empty() {
        let record: PatientRecord = serde_json::from_str(
            r#"{"id": "PT-ALZ-001", "age_group": "70-79", "genotype": {"APOE": "e3/e4"}}"#,
        )
        .unwrap();
        assert!(record.medications.is_empty());
        assert_eq!(record.genotype.get("APOE"), Some("e3/e4"));
    }
}
