//! Wiring of reference data, classifier, scorer and analyzer.

use std::sync::Arc;

use alzgen_common::Result;
use alzgen_config::{Config, ReferenceData};
use alzgen_risk::{InteractionAnalyzer, LogisticRiskClassifier, RiskClassifier, RiskScorer};
use anyhow::Context;

use crate::patient::{action_plan, Assessment, PatientRecord};

/// Everything needed to serve assessments. Immutable once built.
#[derive(Debug, Clone)]
pub struct Engine {
    scorer: RiskScorer,
    analyzer: InteractionAnalyzer,
}

impl Engine {
    /// Load reference tables and the persisted classifier named by `config`.
    pub fn init(config: &Config) -> Result<Self> {
        let reference = ReferenceData::load(&config.reference)?;
        let classifier = Arc::new(LogisticRiskClassifier::load(&config.model.path)?);
        Ok(Self::new(reference, classifier))
    }

    pub fn new(reference: ReferenceData, classifier: Arc<dyn RiskClassifier>) -> Self {
        let scorer = RiskScorer::new(
            reference.gene_effects.clone(),
            reference.age_baselines.clone(),
            reference.drug_rules.clone(),
            classifier,
        );
        let analyzer = InteractionAnalyzer::new(reference.drug_rules.clone());
        Self { scorer, analyzer }
    }

    pub fn assess(&self, patient: &PatientRecord) -> Result<Assessment> {
        let risk = self
            .scorer
            .compute_risk(&patient.genotype, &patient.age_group, patient.medications.as_slice())?;
        let interactions = self
            .analyzer
            .check_interactions(&patient.genotype, patient.medications.as_slice());
        Ok(Assessment {
            patient_id: patient.id.clone(),
            age_group: patient.age_group.clone(),
            action_plan: action_plan(risk.adjusted_risk_percent),
            risk,
            interactions,
        })
    }

    /// Assess every patient on the blocking pool. Outcomes come back in
    /// input order, and one rejected patient does not stop the rest.
    pub async fn assess_batch(
        self: Arc<Self>,
        patients: Vec<PatientRecord>,
    ) -> anyhow::Result<Vec<(String, Result<Assessment>)>> {
        let handles: Vec<_> = patients
            .into_iter()
            .map(|patient| {
                let engine = Arc::clone(&self);
                tokio::task::spawn_blocking(move || {
                    let outcome = engine.assess(&patient);
                    (patient.id, outcome)
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.context("assessment task panicked")?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alzgen_common::{AgeBaselineTable, AlzgenError, GeneEffectTable, GenotypeProfile};
    use alzgen_risk::{FixedProbabilityClassifier, RiskCategory};
    use alzgen_test_utils::sample_drug_rules;
    use pretty_assertions::assert_eq;

    fn engine(probability: f64) -> Engine {
        let reference = ReferenceData::new(
            GeneEffectTable::reference(),
            AgeBaselineTable::reference(),
            sample_drug_rules(),
        );
        Engine::new(reference, Arc::new(FixedProbabilityClassifier::new(probability)))
    }

    fn patient(age_group: &str, medications: &[&str]) -> PatientRecord {
        PatientRecord {
            id: "PT-ALZ-001".to_string(),
            age_group: age_group.to_string(),
            genotype: GenotypeProfile::new().with("APOE", "e4/e4"),
            medications: medications.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_assessment_combines_both_operations() {
        let a = engine(0.7).assess(&patient("80+", &["Warfarin"])).unwrap();
        assert_eq!(a.risk.category, RiskCategory::VeryHigh);
        assert_eq!(a.risk.medication_effects, vec!["Warfarin: 20.0%".to_string()]);
        assert_eq!(a.interactions.recommendations, vec!["Consider Aspirin instead of Warfarin".to_string()]);
        assert_eq!(a.action_plan.len(), 6);
    }

    #[test]
    fn test_low_risk_plan_has_no_referrals() {
        let a = engine(0.01).assess(&patient("50-59", &[])).unwrap();
        assert_eq!(a.risk.category, RiskCategory::Low);
        assert_eq!(a.action_plan.len(), 4);
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_rejections() {
        let patients: Vec<PatientRecord> = [("PT-1", "60-69"), ("PT-2", "unknown"), ("PT-3", "80+")]
            .into_iter()
            .map(|(id, age)| PatientRecord {
                id: id.to_string(),
                ..patient(age, &["Warfarin"])
            })
            .collect();

        let outcomes = Arc::new(engine(0.3)).assess_batch(patients).await.unwrap();

        let ids: Vec<&str> = outcomes.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["PT-1", "PT-2", "PT-3"]);
        assert!(outcomes[0].1.is_ok());
        assert!(matches!(outcomes[1].1, Err(AlzgenError::InvalidInput(_))));
        assert_eq!(outcomes[2].1.as_ref().unwrap().patient_id, "PT-3");
    }

    #[test]
    fn test_unknown_age_group_rejects_request() {
        let err = engine(0.5).assess(&patient("unknown", &[])).unwrap_err();
        assert!(matches!(err, AlzgenError::InvalidInput(_)));
    }
}
