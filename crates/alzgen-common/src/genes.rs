//! Genetic markers, genotype profiles and the per-genotype effect table.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::read_document;
use crate::error::{AlzgenError, Result};

/// The enumerated set of risk loci, in canonical feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeneId {
    #[serde(rename = "APOE")]
    Apoe,
    #[serde(rename = "CLU")]
    Clu,
    #[serde(rename = "CR1")]
    Cr1,
    #[serde(rename = "BIN1")]
    Bin1,
    #[serde(rename = "PICALM")]
    Picalm,
    #[serde(rename = "ABCA7")]
    Abca7,
    #[serde(rename = "MS4A")]
    Ms4a,
    #[serde(rename = "CD33")]
    Cd33,
    #[serde(rename = "CD2AP")]
    Cd2ap,
    #[serde(rename = "EPHA1")]
    Epha1,
    #[serde(rename = "HLA-DRB5")]
    HlaDrb5,
}

impl GeneId {
    pub const COUNT: usize = 11;

    /// Canonical order. Feature vectors and classifier weights follow it.
    pub const ALL: [GeneId; GeneId::COUNT] = [
        GeneId::Apoe,
        GeneId::Clu,
        GeneId::Cr1,
        GeneId::Bin1,
        GeneId::Picalm,
        GeneId::Abca7,
        GeneId::Ms4a,
        GeneId::Cd33,
        GeneId::Cd2ap,
        GeneId::Epha1,
        GeneId::HlaDrb5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneId::Apoe    => "APOE",
            GeneId::Clu     => "CLU",
            GeneId::Cr1     => "CR1",
            GeneId::Bin1    => "BIN1",
            GeneId::Picalm  => "PICALM",
            GeneId::Abca7   => "ABCA7",
            GeneId::Ms4a    => "MS4A",
            GeneId::Cd33    => "CD33",
            GeneId::Cd2ap   => "CD2AP",
            GeneId::Epha1   => "EPHA1",
            GeneId::HlaDrb5 => "HLA-DRB5",
        }
    }

    /// Position of this gene in the canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for GeneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneId {
    type Err = AlzgenError;

    fn from_str(s: &str) -> Result<Self> {
        GeneId::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| AlzgenError::invalid_input(format!("unknown gene: {s}")))
    }
}

// ── Genotype profile ────────────────────────────────────────────────────────

/// A patient's genotype calls, gene symbol → genotype label (e.g. "e3/e4").
///
/// Partial profiles are normal. Genes outside [`GeneId`] and labels the
/// effect table does not know are kept as-is and simply carry no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenotypeProfile(BTreeMap<String, String>);

impl GenotypeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, gene: &str, genotype: &str) -> Self {
        self.insert(gene, genotype);
        self
    }

    pub fn insert(&mut self, gene: impl Into<String>, genotype: impl Into<String>) {
        self.0.insert(gene.into(), genotype.into());
    }

    /// Genotype label recorded for `gene`, if any.
    pub fn get(&self, gene: &str) -> Option<&str> {
        self.0.get(gene).map(String::as_str)
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.0.contains_key(gene)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(g, v)| (g.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GenotypeProfile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ── Effect table ────────────────────────────────────────────────────────────

/// Per-gene, per-genotype effect sizes (log-odds-like; negative is protective).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneEffectTable {
    effects: BTreeMap<GeneId, BTreeMap<String, f64>>,
}

impl GeneEffectTable {
    /// Build a table from explicit entries, rejecting non-finite effects.
    pub fn new(effects: BTreeMap<GeneId, BTreeMap<String, f64>>) -> Result<Self> {
        let table = Self { effects };
        table.validate()?;
        Ok(table)
    }

    /// Effect sizes from the ADSP/IGAP meta-analyses.
    pub fn reference() -> Self {
        const REFERENCE: [(GeneId, &[(&str, f64)]); GeneId::COUNT] = [
            (GeneId::Apoe, &[
                ("e2/e2", -0.89), ("e2/e3", -0.60), ("e2/e4", 0.31),
                ("e3/e3", 0.0), ("e3/e4", 1.21), ("e4/e4", 2.54),
            ]),
            (GeneId::Clu,     &[("CC", 0.0), ("CT", 0.42), ("TT", 0.87)]),
            (GeneId::Cr1,     &[("GG", 0.0), ("GA", 0.38), ("AA", 0.75)]),
            (GeneId::Bin1,    &[("AA", 0.0), ("AG", 0.31), ("GG", 0.63)]),
            (GeneId::Picalm,  &[("TT", 0.0), ("TG", 0.29), ("GG", 0.58)]),
            (GeneId::Abca7,   &[("CC", 0.0), ("CT", 0.33), ("TT", 0.65)]),
            (GeneId::Ms4a,    &[("AA", 0.0), ("AG", 0.28), ("GG", 0.55)]),
            (GeneId::Cd33,    &[("GG", 0.0), ("GT", -0.26), ("TT", -0.51)]),
            (GeneId::Cd2ap,   &[("CC", 0.0), ("CT", 0.27), ("TT", 0.53)]),
            (GeneId::Epha1,   &[("AA", 0.0), ("AG", 0.25), ("GG", 0.49)]),
            (GeneId::HlaDrb5, &[("GG", 0.0), ("GA", 0.23), ("AA", 0.45)]),
        ];

        let effects = REFERENCE
            .iter()
            .map(|(gene, rows)| {
                let labels = rows.iter().map(|(l, e)| (l.to_string(), *e)).collect();
                (*gene, labels)
            })
            .collect();
        Self { effects }
    }

    /// Load an override table from a JSON or YAML document.
    pub fn from_path(path: &Path) -> Result<Self> {
        let table: Self = read_document(path)?;
        table.validate()?;
        tracing::info!(path = %path.display(), genes = table.effects.len(), "loaded gene effect table");
        Ok(table)
    }

    /// Layer `overrides` on top of this table. Labels named in the override
    /// replace or extend the base; genes and labels it omits keep their
    /// base values.
    pub fn merged_with(mut self, overrides: GeneEffectTable) -> Self {
        for (gene, labels) in overrides.effects {
            self.effects.entry(gene).or_default().extend(labels);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (gene, labels) in &self.effects {
            for (label, effect) in labels {
                if !effect.is_finite() {
                    return Err(AlzgenError::config(format!(
                        "effect size for {gene} {label} is not finite"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Effect of `genotype` at `gene`; `None` if either is unknown.
    pub fn effect(&self, gene: GeneId, genotype: &str) -> Option<f64> {
        self.effects.get(&gene)?.get(genotype).copied()
    }

    /// Known genotype labels for a gene, in lexical order.
    pub fn genotypes(&self, gene: GeneId) -> Vec<&str> {
        self.effects
            .get(&gene)
            .map(|labels| labels.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The genotype label carrying zero effect at `gene`, if the table has one.
    pub fn zero_effect_genotype(&self, gene: GeneId) -> Option<&str> {
        self.effects
            .get(&gene)?
            .iter()
            .find(|(_, e)| **e == 0.0)
            .map(|(l, _)| l.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unlisted_genes_and_labels() {
        let overrides: GeneEffectTable =
            serde_yaml::from_str("APOE:\n  e4/e4: 3.0\n  e4/e5: 4.0\n").unwrap();
        let table = GeneEffectTable::reference().merged_with(overrides);
        assert_eq!(table.effect(GeneId::Apoe, "e4/e4"), Some(3.0));
        assert_eq!(table.effect(GeneId::Apoe, "e4/e5"), Some(4.0));
        assert_eq!(table.effect(GeneId::Apoe, "e3/e4"), Some(1.21));
        assert_eq!(table.effect(GeneId::Clu, "TT"), Some(0.87));
    }

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, gene) in GeneId::ALL.iter().enumerate() {
            assert_eq!(gene.index(), i);
        }
        assert_eq!(GeneId::ALL[0], GeneId::Apoe);
        assert_eq!(GeneId::ALL[10], GeneId::HlaDrb5);
    }

    #[test]
    fn test_gene_id_parse() {
        assert_eq!("HLA-DRB5".parse::<GeneId>().unwrap(), GeneId::HlaDrb5);
        assert!("TREM2".parse::<GeneId>().is_err());
    }

    #[test]
    fn test_reference_table_effects() {
        let table = GeneEffectTable::reference();
        assert_eq!(table.effect(GeneId::Apoe, "e4/e4"), Some(2.54));
        assert_eq!(table.effect(GeneId::Cd33, "TT"), Some(-0.51));
        assert_eq!(table.effect(GeneId::Apoe, "e5/e5"), None);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_every_reference_gene_has_zero_effect_genotype() {
        let table = GeneEffectTable::reference();
        for gene in GeneId::ALL {
            let label = table.zero_effect_genotype(gene).unwrap();
            assert_eq!(table.effect(gene, label), Some(0.0));
        }
    }

    #[test]
    fn test_unknown_gene_in_document_is_rejected() {
        let doc = r#"{"APOE": {"e3/e3": 0.0}, "TREM2": {"CC": 0.1}}"#;
        let parsed: std::result::Result<GeneEffectTable, _> = serde_json::from_str(doc);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_non_finite_effect_rejected() {
        let mut effects = BTreeMap::new();
        effects.insert(GeneId::Clu, BTreeMap::from([("CT".to_string(), f64::NAN)]));
        let err = GeneEffectTable::new(effects).unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }

    #[test]
    fn test_profile_keeps_unknown_genes() {
        let profile = GenotypeProfile::new()
            .with("APOE", "e3/e4")
            .with("TREM2", "R47H");
        assert_eq!(profile.get("TREM2"), Some("R47H"));
        assert!(profile.contains("APOE"));
        assert_eq!(profile.len(), 2);
    }
}
