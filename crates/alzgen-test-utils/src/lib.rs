//! Shared fixtures for AlzGen tests: reference documents, rule tables,
//! genotype profiles and temporary files.

use std::io::Write;

use alzgen_common::{DrugRuleTable, GeneEffectTable, GeneId, GenotypeProfile};
use tempfile::NamedTempFile;

pub use pretty_assertions;

/// A small interaction document in the on-disk format.
pub const SAMPLE_DRUG_RULES_JSON: &str = r#"{
    "APOE": {
        "Warfarin": 0.2,
        "Donepezil": -0.15,
        "alternatives": ["Aspirin"]
    },
    "CLU": {
        "Simvastatin": -0.1,
        "Warfarin": 0.05
    },
    "CD33": {
        "Lorazepam": 0.3,
        "alternatives": ["Melatonin", "Trazodone"]
    }
}"#;

/// Parsed form of [`SAMPLE_DRUG_RULES_JSON`].
pub fn sample_drug_rules() -> DrugRuleTable {
    let table: DrugRuleTable = serde_json::from_str(SAMPLE_DRUG_RULES_JSON)
        .expect("sample drug rules must parse");
    table.validate().expect("sample drug rules must validate");
    table
}

/// Write `content` to a temporary file whose name ends in `suffix`
/// (".json", ".yaml", ...). The file lives as long as the handle.
pub fn write_temp_document(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("alzgen-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// A profile assigning every gene its zero-effect genotype.
pub fn zero_effect_profile(table: &GeneEffectTable) -> GenotypeProfile {
    GeneId::ALL
        .iter()
        .filter_map(|g| table.zero_effect_genotype(*g).map(|l| (g.as_str(), l)))
        .collect()
}

/// APOE e4 homozygote, otherwise unremarkable.
pub fn apoe4_homozygote() -> GenotypeProfile {
    GenotypeProfile::new().with("APOE", "e4/e4")
}
