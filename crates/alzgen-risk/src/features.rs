//! Genotype → fixed-order numeric feature vector.

use alzgen_common::{GeneEffectTable, GeneId, GenotypeProfile};
use serde::{Deserialize, Serialize};

/// One effect size per [`GeneId`], in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; GeneId::COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; GeneId::COUNT]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; GeneId::COUNT])
    }

    pub fn get(&self, gene: GeneId) -> f64 {
        self.0[gene.index()]
    }

    pub fn as_array(&self) -> &[f64; GeneId::COUNT] {
        &self.0
    }

    /// Sum of all effects; used by the synthetic cohort's outcome model.
    pub fn total_effect(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Look up each gene's genotype in the effect table.
/// Absent genes and unrecognized labels contribute 0.0.
pub fn build_vector(genotype: &GenotypeProfile, table: &GeneEffectTable) -> FeatureVector {
    let mut values = [0.0; GeneId::COUNT];
    for gene in GeneId::ALL {
        values[gene.index()] = genotype
            .get(gene.as_str())
            .and_then(|label| table.effect(gene, label))
            .unwrap_or(0.0);
    }
    FeatureVector(values)
}
