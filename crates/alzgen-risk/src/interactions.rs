//! Gene–drug interaction checks.

use std::sync::Arc;

use alzgen_common::{DrugRuleTable, GenotypeProfile};
use serde::{Deserialize, Serialize};

/// A rule that fires for one medication at one gene of the patient's profile.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleMatch<'a> {
    pub gene: &'a str,
    pub genotype: &'a str,
    pub factor: f64,
    pub alternatives: &'a [String],
}

/// Rules triggered by `medication`, in rule-table order. A gene is only
/// considered when the profile has a call for it, whatever the label.
pub(crate) fn matching_rules<'a>(
    rules: &'a DrugRuleTable,
    genotype: &'a GenotypeProfile,
    medication: &'a str,
) -> impl Iterator<Item = RuleMatch<'a>> + 'a {
    rules.iter().filter_map(move |(gene, gene_rules)| {
        let label = genotype.get(gene)?;
        let factor = gene_rules.factor(medication)?;
        Some(RuleMatch {
            gene,
            genotype: label,
            factor,
            alternatives: &gene_rules.alternatives,
        })
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl InteractionResult {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.recommendations.is_empty()
    }
}

/// Cross-references medications against the patient's genotype.
#[derive(Debug, Clone)]
pub struct InteractionAnalyzer {
    drug_rules: Arc<DrugRuleTable>,
}

impl InteractionAnalyzer {
    pub fn new(drug_rules: Arc<DrugRuleTable>) -> Self {
        Self { drug_rules }
    }

    /// One warning per (medication, gene) match, medications in input
    /// order. Every alternative listed at a matching gene yields a
    /// recommendation for the triggering medication. Nothing is
    /// de-duplicated.
    pub fn check_interactions<M: AsRef<str>>(
        &self,
        genotype: &GenotypeProfile,
        medications: &[M],
    ) -> InteractionResult {
        let mut result = InteractionResult::default();

        for med in medications {
            let med = med.as_ref();
            for m in matching_rules(&self.drug_rules, genotype, med) {
                let direction = if m.factor > 0.0 { "increase" } else { "decrease" };
                result.warnings.push(format!(
                    "{med} may {direction} AD risk by {:.1}% in {} {} carriers",
                    m.factor.abs() * 100.0,
                    m.gene,
                    m.genotype
                ));
                for alt in m.alternatives {
                    result
                        .recommendations
                        .push(format!("Consider {alt} instead of {med}"));
                }
            }
        }

        tracing::debug!(
            medications = medications.len(),
            warnings = result.warnings.len(),
            recommendations = result.recommendations.len(),
            "interaction check complete"
        );
        result
    }
}
