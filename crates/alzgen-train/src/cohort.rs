//! Synthetic cohort generation.
//!
//! Stand-in for a real ADNI/UKB extract: every subject gets a genotype
//! drawn uniformly from the effect table, and an outcome drawn from a
//! logistic link of the summed effects.

use alzgen_common::{GeneEffectTable, GeneId, GenotypeProfile};
use alzgen_risk::classifier::sigmoid;
use alzgen_risk::{build_vector, FeatureVector};
use rand::seq::SliceRandom;
use rand::Rng;

/// Centres the summed effect so both outcome classes are well populated.
const OUTCOME_OFFSET: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: bool,
}

pub fn random_genotype<R: Rng + ?Sized>(table: &GeneEffectTable, rng: &mut R) -> GenotypeProfile {
    let mut profile = GenotypeProfile::new();
    for gene in GeneId::ALL {
        if let Some(label) = table.genotypes(gene).choose(rng) {
            profile.insert(gene.as_str(), *label);
        }
    }
    profile
}

pub fn synthetic_cohort<R: Rng + ?Sized>(
    table: &GeneEffectTable,
    size: usize,
    rng: &mut R,
) -> Vec<Sample> {
    (0..size)
        .map(|_| {
            let features = build_vector(&random_genotype(table, rng), table);
            let p = sigmoid(features.total_effect() - OUTCOME_OFFSET);
            Sample {
                features,
                label: rng.gen_bool(p),
            }
        })
        .collect()
}
