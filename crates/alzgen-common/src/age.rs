//! Age brackets and their population-baseline risk multipliers.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::read_document;
use crate::error::{AlzgenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "50-59")]
    Fifties,
    #[serde(rename = "60-69")]
    Sixties,
    #[serde(rename = "70-79")]
    Seventies,
    #[serde(rename = "80+")]
    EightyPlus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Fifties,
        AgeGroup::Sixties,
        AgeGroup::Seventies,
        AgeGroup::EightyPlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Fifties    => "50-59",
            AgeGroup::Sixties    => "60-69",
            AgeGroup::Seventies  => "70-79",
            AgeGroup::EightyPlus => "80+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = AlzgenError;

    fn from_str(s: &str) -> Result<Self> {
        AgeGroup::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| {
                AlzgenError::invalid_input(format!(
                    "unrecognized age group '{s}' (expected one of 50-59, 60-69, 70-79, 80+)"
                ))
            })
    }
}

/// Age bracket → baseline multiplier. Always covers every bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeBaselineTable {
    baselines: BTreeMap<AgeGroup, f64>,
}

impl AgeBaselineTable {
    pub fn new(baselines: BTreeMap<AgeGroup, f64>) -> Result<Self> {
        let table = Self { baselines };
        table.validate()?;
        Ok(table)
    }

    /// Reference epidemiological baselines.
    pub fn reference() -> Self {
        Self {
            baselines: BTreeMap::from([
                (AgeGroup::Fifties, 1.2),
                (AgeGroup::Sixties, 3.4),
                (AgeGroup::Seventies, 7.1),
                (AgeGroup::EightyPlus, 16.3),
            ]),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let table: Self = read_document(path)?;
        table.validate()?;
        tracing::info!(path = %path.display(), "loaded age baseline table");
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        for group in AgeGroup::ALL {
            match self.baselines.get(&group) {
                None => {
                    return Err(AlzgenError::config(format!(
                        "age baseline table has no entry for {group}"
                    )))
                }
                Some(m) if !m.is_finite() || *m <= 0.0 => {
                    return Err(AlzgenError::config(format!(
                        "baseline multiplier for {group} must be positive, got {m}"
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn multiplier(&self, group: AgeGroup) -> Result<f64> {
        self.baselines.get(&group).copied().ok_or_else(|| {
            AlzgenError::invalid_input(format!("no baseline for age group {group}"))
        })
    }

    /// Resolve a caller-supplied bracket label to its multiplier.
    pub fn multiplier_for_label(&self, label: &str) -> Result<f64> {
        let group: AgeGroup = label.parse()?;
        self.multiplier(group)
    }
}
