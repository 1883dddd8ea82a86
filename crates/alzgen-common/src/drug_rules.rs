//! Medication–gene interaction rules.
//!
//! On disk each gene maps medication names to a signed adjustment factor,
//! with the reserved key `alternatives` holding substitute medications:
//!
//! ```json
//! { "APOE": { "Warfarin": 0.2, "alternatives": ["Aspirin"] } }
//! ```
//!
//! In memory the reserved key is split out into [`GeneRules::alternatives`]
//! so that a medication lookup can never hit it. Gene order and
//! alternatives order follow the document.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::document::read_document;
use crate::error::{AlzgenError, Result};

/// Reserved key carrying substitute medications in the document format.
pub const ALTERNATIVES_KEY: &str = "alternatives";

/// Rules attached to one gene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneRules {
    /// Medication → adjustment factor (0.2 means +20 % risk).
    pub medication_effects: BTreeMap<String, f64>,
    /// Substitute medications, in document order.
    pub alternatives: Vec<String>,
}

impl GeneRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, medication: &str, factor: f64) -> Self {
        self.medication_effects.insert(medication.to_string(), factor);
        self
    }

    pub fn with_alternatives(mut self, alternatives: &[&str]) -> Self {
        self.alternatives = alternatives.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Adjustment factor for `medication` at this gene, if one is listed.
    pub fn factor(&self, medication: &str) -> Option<f64> {
        self.medication_effects.get(medication).copied()
    }

    fn validate(&self, gene: &str) -> Result<()> {
        for (med, factor) in &self.medication_effects {
            if !factor.is_finite() {
                return Err(AlzgenError::config(format!(
                    "{gene}: adjustment factor for {med} is not finite"
                )));
            }
            if *factor <= -1.0 {
                return Err(AlzgenError::config(format!(
                    "{gene}: adjustment factor for {med} must be greater than -1.0, got {factor}"
                )));
            }
        }
        if self.alternatives.iter().any(|a| a.trim().is_empty()) {
            return Err(AlzgenError::config(format!(
                "{gene}: alternatives must be non-empty medication names"
            )));
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for GeneRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GeneRulesVisitor;

        impl<'de> Visitor<'de> for GeneRulesVisitor {
            type Value = GeneRules;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of medication → factor with an optional `alternatives` list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<GeneRules, A::Error> {
                let mut rules = GeneRules::default();
                let mut seen_alternatives = false;
                while let Some(key) = map.next_key::<String>()? {
                    if key == ALTERNATIVES_KEY {
                        if seen_alternatives {
                            return Err(de::Error::duplicate_field(ALTERNATIVES_KEY));
                        }
                        rules.alternatives = map.next_value::<Vec<String>>()?;
                        seen_alternatives = true;
                    } else {
                        let factor = map.next_value::<f64>()?;
                        if rules.medication_effects.insert(key.clone(), factor).is_some() {
                            return Err(de::Error::custom(format!("duplicate medication `{key}`")));
                        }
                    }
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(GeneRulesVisitor)
    }
}

/// The full rule table, gene → [`GeneRules`], in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugRuleTable {
    genes: Vec<(String, GeneRules)>,
}

impl DrugRuleTable {
    pub fn new(genes: Vec<(String, GeneRules)>) -> Result<Self> {
        let table = Self { genes };
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let table: Self = read_document(path)?;
        table.validate()?;
        tracing::info!(
            path = %path.display(),
            genes = table.genes.len(),
            medications = table.known_medications().len(),
            "loaded drug interaction rules"
        );
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (gene, rules) in &self.genes {
            if !seen.insert(gene.as_str()) {
                return Err(AlzgenError::config(format!("duplicate gene `{gene}` in drug rules")));
            }
            rules.validate(gene)?;
        }
        Ok(())
    }

    /// Genes and their rules, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneRules)> {
        self.genes.iter().map(|(g, r)| (g.as_str(), r))
    }

    pub fn get(&self, gene: &str) -> Option<&GeneRules> {
        self.genes.iter().find(|(g, _)| g == gene).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Every medication with a rule at any gene, sorted and de-duplicated.
    /// Alternatives are not included.
    pub fn known_medications(&self) -> Vec<String> {
        self.genes
            .iter()
            .flat_map(|(_, r)| r.medication_effects.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'de> Deserialize<'de> for DrugRuleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = DrugRuleTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of gene → interaction rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DrugRuleTable, A::Error> {
                let mut genes = Vec::new();
                while let Some((gene, rules)) = map.next_entry::<String, GeneRules>()? {
                    genes.push((gene, rules));
                }
                Ok(DrugRuleTable { genes })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
