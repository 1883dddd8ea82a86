//! Lifetime risk computation.
//!
//! risk = min(95, p × 100 × baseline[age]) × Π (1 + factor)
//!
//! The cap applies before the medication multipliers, so a final value
//! above 95 is possible when a medication raises risk.

use std::fmt;
use std::sync::Arc;

use alzgen_common::{
    AgeBaselineTable, AlzgenError, DrugRuleTable, GeneEffectTable, GenotypeProfile, Result,
};
use serde::{Deserialize, Serialize};

use crate::classifier::RiskClassifier;
use crate::features::build_vector;
use crate::interactions::matching_rules;

/// Ceiling on the baseline-scaled risk, in percent.
pub const RISK_CAP_PERCENT: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low      => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::High     => "High",
            RiskCategory::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First match wins; lower bounds are inclusive.
pub fn categorize(risk_percent: f64) -> RiskCategory {
    if risk_percent < 10.0 {
        RiskCategory::Low
    } else if risk_percent < 25.0 {
        RiskCategory::Moderate
    } else if risk_percent < 40.0 {
        RiskCategory::High
    } else {
        RiskCategory::VeryHigh
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub raw_probability: f64,
    pub adjusted_risk_percent: f64,
    pub category: RiskCategory,
    /// "<medication>: <factor %>", in medication input order.
    pub medication_effects: Vec<String>,
}

/// Combines classifier output, age baseline and medication rules.
///
/// All state is read-only after construction; share it across threads
/// behind an `Arc`.
#[derive(Clone)]
pub struct RiskScorer {
    gene_effects: Arc<GeneEffectTable>,
    age_baselines: Arc<AgeBaselineTable>,
    drug_rules: Arc<DrugRuleTable>,
    classifier: Arc<dyn RiskClassifier>,
}

impl fmt::Debug for RiskScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskScorer")
            .field("drug_rule_genes", &self.drug_rules.len())
            .finish_non_exhaustive()
    }
}

impl RiskScorer {
    pub fn new(
        gene_effects: Arc<GeneEffectTable>,
        age_baselines: Arc<AgeBaselineTable>,
        drug_rules: Arc<DrugRuleTable>,
        classifier: Arc<dyn RiskClassifier>,
    ) -> Self {
        Self {
            gene_effects,
            age_baselines,
            drug_rules,
            classifier,
        }
    }

    /// Score one patient.
    ///
    /// Fails only for an unrecognized `age_group`. Unknown genes, unknown
    /// genotype labels and unlisted medications contribute nothing.
    pub fn compute_risk<M: AsRef<str>>(
        &self,
        genotype: &GenotypeProfile,
        age_group: &str,
        medications: &[M],
    ) -> Result<RiskScore> {
        let baseline = self.age_baselines.multiplier_for_label(age_group)?;

        let features = build_vector(genotype, &self.gene_effects);
        let probability = self.checked_probability(self.classifier.predict_probability(&features))?;

        let base_risk = probability * 100.0 * baseline;
        let mut adjusted_risk = base_risk.min(RISK_CAP_PERCENT);

        let mut medication_effects = Vec::new();
        for med in medications {
            let med = med.as_ref();
            for m in matching_rules(&self.drug_rules, genotype, med) {
                adjusted_risk *= 1.0 + m.factor;
                medication_effects.push(format!("{med}: {:.1}%", m.factor * 100.0));
            }
        }

        let category = categorize(adjusted_risk);
        tracing::debug!(
            genes = genotype.len(),
            medications = medications.len(),
            probability,
            base_risk,
            adjusted_risk,
            %category,
            "risk computed"
        );

        Ok(RiskScore {
            raw_probability: probability,
            adjusted_risk_percent: adjusted_risk,
            category,
            medication_effects,
        })
    }

    fn checked_probability(&self, p: f64) -> Result<f64> {
        if p.is_nan() {
            return Err(AlzgenError::config("risk classifier returned NaN"));
        }
        if !(0.0..=1.0).contains(&p) {
            tracing::warn!(probability = p, "classifier output outside [0, 1], clamping");
        }
        Ok(p.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FixedProbabilityClassifier;
    use alzgen_common::GeneRules;
    use alzgen_test_utils::{apoe4_homozygote, sample_drug_rules, zero_effect_profile};
    use pretty_assertions::assert_eq;

    fn scorer(probability: f64, rules: DrugRuleTable) -> RiskScorer {
        RiskScorer::new(
            Arc::new(GeneEffectTable::reference()),
            Arc::new(AgeBaselineTable::reference()),
            Arc::new(rules),
            Arc::new(FixedProbabilityClassifier::new(probability)),
        )
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(categorize(9.99), RiskCategory::Low);
        assert_eq!(categorize(10.0), RiskCategory::Moderate);
        assert_eq!(categorize(24.99), RiskCategory::Moderate);
        assert_eq!(categorize(25.0), RiskCategory::High);
        assert_eq!(categorize(39.99), RiskCategory::High);
        assert_eq!(categorize(40.0), RiskCategory::VeryHigh);
        assert_eq!(categorize(0.0), RiskCategory::Low);
        assert_eq!(categorize(120.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_apoe4_eighty_plus_is_capped() {
        let score = scorer(0.7, DrugRuleTable::default())
            .compute_risk(&apoe4_homozygote(), "80+", &[] as &[&str])
            .unwrap();
        // 0.7 × 100 × 16.3 = 1141 → 95
        assert_eq!(score.adjusted_risk_percent, 95.0);
        assert_eq!(score.category, RiskCategory::VeryHigh);
        assert_eq!(score.raw_probability, 0.7);
        assert!(score.medication_effects.is_empty());
    }

    #[test]
    fn test_zero_effect_profile_without_medications() {
        let profile = zero_effect_profile(&GeneEffectTable::reference());
        for (p, age, baseline) in [(0.02, "50-59", 1.2), (0.05, "70-79", 7.1), (0.5, "60-69", 3.4)] {
            let score = scorer(p, sample_drug_rules())
                .compute_risk(&profile, age, &[] as &[&str])
                .unwrap();
            assert_eq!(score.adjusted_risk_percent, (p * 100.0 * baseline).min(95.0));
        }
    }

    #[test]
    fn test_unknown_age_group_is_invalid_input() {
        let err = scorer(0.5, sample_drug_rules())
            .compute_risk(&apoe4_homozygote(), "unknown", &["Warfarin"])
            .unwrap_err();
        assert!(matches!(err, AlzgenError::InvalidInput(_)));
    }

    #[test]
    fn test_medication_applied_after_cap() {
        let rules = DrugRuleTable::new(vec![(
            "APOE".to_string(),
            GeneRules::new().with_effect("Warfarin", 0.2),
        )])
        .unwrap();
        let score = scorer(0.7, rules)
            .compute_risk(&apoe4_homozygote(), "80+", &["Warfarin"])
            .unwrap();
        assert!((score.adjusted_risk_percent - 114.0).abs() < 1e-9);
        assert_eq!(score.medication_effects, vec!["Warfarin: 20.0%".to_string()]);
    }

    #[test]
    fn test_protective_medication_lowers_category() {
        // 0.1 × 100 × 3.4 = 34 (High), × 0.7 = 23.8 (Moderate)
        let rules = DrugRuleTable::new(vec![(
            "APOE".to_string(),
            GeneRules::new().with_effect("Donepezil", -0.3),
        )])
        .unwrap();
        let score = scorer(0.1, rules)
            .compute_risk(&apoe4_homozygote(), "60-69", &["Donepezil"])
            .unwrap();
        assert!((score.adjusted_risk_percent - 23.8).abs() < 1e-9);
        assert_eq!(score.category, RiskCategory::Moderate);
        assert_eq!(score.medication_effects, vec!["Donepezil: -30.0%".to_string()]);
    }

    #[test]
    fn test_medication_order_changes_log_not_value() {
        let profile = GenotypeProfile::new()
            .with("APOE", "e3/e4")
            .with("CLU", "CT")
            .with("CD33", "GG");
        let s = scorer(0.2, sample_drug_rules());
        let forward = s
            .compute_risk(&profile, "70-79", &["Warfarin", "Lorazepam", "Simvastatin"])
            .unwrap();
        let reverse = s
            .compute_risk(&profile, "70-79", &["Simvastatin", "Lorazepam", "Warfarin"])
            .unwrap();

        assert!((forward.adjusted_risk_percent - reverse.adjusted_risk_percent).abs() < 1e-9);
        assert_eq!(
            forward.medication_effects,
            vec!["Warfarin: 20.0%", "Warfarin: 5.0%", "Lorazepam: 30.0%", "Simvastatin: -10.0%"]
        );
        assert_eq!(
            reverse.medication_effects,
            vec!["Simvastatin: -10.0%", "Lorazepam: 30.0%", "Warfarin: 20.0%", "Warfarin: 5.0%"]
        );
    }

    #[test]
    fn test_medication_for_absent_gene_ignored() {
        let profile = GenotypeProfile::new().with("CLU", "CC");
        let score = scorer(0.1, sample_drug_rules())
            .compute_risk(&profile, "50-59", &["Lorazepam"])
            .unwrap();
        assert!((score.adjusted_risk_percent - 12.0).abs() < 1e-9);
        assert!(score.medication_effects.is_empty());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let s = scorer(0.33, sample_drug_rules());
        let profile = apoe4_homozygote();
        let a = s.compute_risk(&profile, "70-79", &["Warfarin"]).unwrap();
        let b = s.compute_risk(&profile, "70-79", &["Warfarin"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_probability_clamped() {
        let score = scorer(1.5, DrugRuleTable::default())
            .compute_risk(&GenotypeProfile::new(), "50-59", &[] as &[&str])
            .unwrap();
        assert_eq!(score.raw_probability, 1.0);
    }

    #[test]
    fn test_nan_probability_rejected() {
        let err = scorer(f64::NAN, DrugRuleTable::default())
            .compute_risk(&GenotypeProfile::new(), "50-59", &[] as &[&str])
            .unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }
}
