//! Dose rule parsing and weight-based dose calculation.
//!
//! Dosing instructions in the dataset are free text. This module extracts
//! a numeric per-kilogram rule from the recognized shapes, multiplies it
//! by the patient's weight in kilograms, and checks the result against
//! the record's free-text maximum-dose ceiling.

use crate::units;
use crate::{DoseCalculationResult, DoseRule, DoseUnit, DrugRecord, PatientInput};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel in the contraindications column meaning "no contraindications".
const NO_CONTRAINDICATIONS: &str = "None";

/// Placeholder in the max-dose column meaning "not specified".
const MAX_DOSE_UNSPECIFIED: &str = "—";

/// Recognized dosing shapes, tried in order; first match wins.
///
/// Per-day shapes come before bare per-kg shapes so that
/// `40 mg/kg/day` is not under-matched as `40 mg/kg`. Each pattern
/// captures a dose number and an optional range upper bound.
static DOSE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(\d+(?:\.\d+)?)-?(\d+(?:\.\d+)?)?\s*mg/kg/day",
        r"(?i)(\d+(?:\.\d+)?)\s*mg/kg/day",
        r"(?i)(\d+(?:\.\d+)?)-?(\d+(?:\.\d+)?)?\s*mg/kg",
        r"(?i)(\d+(?:\.\d+)?)\s*mg/kg",
        r"(?i)(\d+(?:\.\d+)?)-?(\d+(?:\.\d+)?)?\s*mcg/kg",
        r"(?i)(\d+(?:\.\d+)?)\s*mcg/kg",
        r"(?i)(\d+(?:\.\d+)?)-?(\d+(?:\.\d+)?)?\s*U/kg",
        r"(?i)(\d+(?:\.\d+)?)\s*U/kg",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("dose pattern must compile"))
    .collect()
});

/// First numeric token in a max-dose ceiling string.
static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeric pattern must compile"));

/// Extract a per-kilogram dosing rule from free-text dosing instructions.
///
/// A range (`10-20 mg/kg`) yields the arithmetic mean of its bounds. Text
/// with no recognizable shape yields a zero-amount mg rule; callers must
/// treat that as "could not parse", not as a prescribed zero dose.
pub fn parse_dose_rule(text: &str) -> DoseRule {
    for pattern in DOSE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let low: f64 = caps[1].parse().unwrap_or(0.0);
            let high: f64 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(low);

            return DoseRule {
                per_kg_amount: (low + high) / 2.0,
                unit: dose_unit_of(text),
            };
        }
    }

    DoseRule {
        per_kg_amount: 0.0,
        unit: DoseUnit::Mg,
    }
}

/// Dose unit implied by the full dosing text, by substring presence.
/// The units check runs last so `U/kg` wins over an incidental `mcg`.
fn dose_unit_of(text: &str) -> DoseUnit {
    let mut unit = DoseUnit::Mg;
    if text.contains("mcg") {
        unit = DoseUnit::Mcg;
    }
    if text.contains("U/kg") || text.contains("unit") {
        unit = DoseUnit::Units;
    }
    unit
}

/// Compare a computed dose against a free-text maximum-dose ceiling.
///
/// An empty ceiling, the `—` placeholder, or text with no numeric token
/// means "not specified" and never reads as exceeded. Units are
/// reconciled before comparison: an mcg dose against an mg ceiling is
/// divided by 1000, and an mg dose against an mcg ceiling multiplied.
pub fn check_max_dose(computed_dose: f64, dose_unit: DoseUnit, max_dose_text: &str) -> bool {
    let text = max_dose_text.trim();
    if text.is_empty() || text == MAX_DOSE_UNSPECIFIED {
        return false;
    }

    let threshold = match NUMERIC_TOKEN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        Some(value) => value,
        None => return false,
    };

    let reconciled = if dose_unit == DoseUnit::Mcg && text.contains("mg") {
        units::scale_dose(computed_dose, DoseUnit::Mcg, DoseUnit::Mg)
    } else if dose_unit == DoseUnit::Mg && text.contains("mcg") {
        units::scale_dose(computed_dose, DoseUnit::Mg, DoseUnit::Mcg)
    } else {
        computed_dose
    };

    reconciled > threshold
}

/// Compute a full dose calculation for one drug and one patient.
///
/// Requires `patient.weight_value > 0`; the (0, 200) domain is enforced
/// at the calling boundary, not here. Never fails for a well-formed
/// record: unparseable dosing text yields `computed_dose == 0` with no
/// dose-related warning.
pub fn calculate_dose(drug: &DrugRecord, patient: &PatientInput) -> DoseCalculationResult {
    let mut warnings = Vec::new();

    let weight_kg = units::to_kilograms(patient.weight_value, patient.weight_unit);
    let rule = parse_dose_rule(&drug.pediatric_dose);
    let computed_dose = rule.per_kg_amount * weight_kg;

    if !drug.contraindications.is_empty() && drug.contraindications != NO_CONTRAINDICATIONS {
        warnings.push(format!("Contraindications: {}", drug.contraindications));
    }

    let max_dose_exceeded = check_max_dose(computed_dose, rule.unit, &drug.max_dose);
    if max_dose_exceeded {
        warnings.push(format!(
            "Calculated dose exceeds maximum: {}",
            drug.max_dose
        ));
    }

    if !drug.special_notes.is_empty() {
        warnings.push(format!("Special Notes: {}", drug.special_notes));
    }

    tracing::debug!(
        "Calculated {:.4} {} for {} at {:.2} kg",
        computed_dose,
        rule.unit,
        drug.name,
        weight_kg
    );

    DoseCalculationResult {
        drug_id: drug.id.clone(),
        drug_name: drug.name.clone(),
        patient_weight: patient.weight_value,
        patient_weight_unit: patient.weight_unit,
        computed_dose,
        dose_unit: rule.unit,
        frequency: drug.frequency.clone(),
        max_dose_exceeded,
        max_dose: drug.max_dose.clone(),
        warnings,
    }
}
