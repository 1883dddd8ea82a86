//! Plain-text rendering of an assessment for the terminal.

use std::fmt::Write;

use crate::patient::Assessment;

pub fn render(a: &Assessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AlzGen Insight - Alzheimer's Genetic Risk Assessment");
    let _ = writeln!(out, "Patient ID: {}", a.patient_id);
    let _ = writeln!(out, "Age Group:  {}", a.age_group);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Lifetime AD Risk: {:.1}% ({})",
        a.risk.adjusted_risk_percent, a.risk.category
    );

    section(&mut out, "Medication Impact", &a.risk.medication_effects,
        "No medication-related risk modification detected.");
    section(&mut out, "Drug Interaction Warnings", &a.interactions.warnings,
        "No critical gene-drug warnings.");
    section(&mut out, "Recommendations", &a.interactions.recommendations,
        "No special recommendations.");
    section(&mut out, "Clinical Action Plan", &a.action_plan, "");
    out
}

fn section(out: &mut String, title: &str, items: &[String], empty: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    if items.is_empty() {
        let _ = writeln!(out, "  {empty}");
    }
    for item in items {
        let _ = writeln!(out, "  • {item}");
    }
}
