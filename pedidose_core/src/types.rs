//! Core domain types for the PediDose system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Drug records and the loaded formulary
//! - Patient input and weight/age units
//! - Parsed dose rules and calculation results
//! - Filter criteria and sort keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Medical Systems
// ============================================================================

/// Clinical-specialty tag used to classify drugs.
///
/// The dataset stores these as underscore-separated tags (the "canonical tag"),
/// e.g. `Toxicology_Emergency`. The loader keeps the raw tag string on each
/// record; this enum types the known set for pickers and quick filters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MedicalSystem {
    Cardiovascular,
    Dermatology,
    Endocrine,
    FluidElectrolyte,
    Gastroenterology,
    Hematology,
    ImmunologyAllergy,
    InfectiousDiseases,
    MetabolicDisorders,
    MusculoskeletalOrthopedics,
    Neonatology,
    Nephrology,
    Neurological,
    Oncology,
    Ophthalmology,
    Otolaryngology,
    PainManagementAnesthesia,
    PsychiatryBehavioral,
    Respiratory,
    Rheumatology,
    ToxicologyEmergency,
    Vaccinology,
}

impl MedicalSystem {
    /// All known systems, in dataset order.
    pub const ALL: [MedicalSystem; 22] = [
        MedicalSystem::Cardiovascular,
        MedicalSystem::Dermatology,
        MedicalSystem::Endocrine,
        MedicalSystem::FluidElectrolyte,
        MedicalSystem::Gastroenterology,
        MedicalSystem::Hematology,
        MedicalSystem::ImmunologyAllergy,
        MedicalSystem::InfectiousDiseases,
        MedicalSystem::MetabolicDisorders,
        MedicalSystem::MusculoskeletalOrthopedics,
        MedicalSystem::Neonatology,
        MedicalSystem::Nephrology,
        MedicalSystem::Neurological,
        MedicalSystem::Oncology,
        MedicalSystem::Ophthalmology,
        MedicalSystem::Otolaryngology,
        MedicalSystem::PainManagementAnesthesia,
        MedicalSystem::PsychiatryBehavioral,
        MedicalSystem::Respiratory,
        MedicalSystem::Rheumatology,
        MedicalSystem::ToxicologyEmergency,
        MedicalSystem::Vaccinology,
    ];

    /// The canonical underscore-separated tag as it appears in the dataset.
    pub fn tag(&self) -> &'static str {
        match self {
            MedicalSystem::Cardiovascular => "Cardiovascular",
            MedicalSystem::Dermatology => "Dermatology",
            MedicalSystem::Endocrine => "Endocrine",
            MedicalSystem::FluidElectrolyte => "Fluid_Electrolyte",
            MedicalSystem::Gastroenterology => "Gastroenterology",
            MedicalSystem::Hematology => "Hematology",
            MedicalSystem::ImmunologyAllergy => "Immunology_Allergy",
            MedicalSystem::InfectiousDiseases => "Infectious_Diseases",
            MedicalSystem::MetabolicDisorders => "Metabolic_Disorders",
            MedicalSystem::MusculoskeletalOrthopedics => "Musculoskeletal_Orthopedics",
            MedicalSystem::Neonatology => "Neonatology",
            MedicalSystem::Nephrology => "Nephrology",
            MedicalSystem::Neurological => "Neurological",
            MedicalSystem::Oncology => "Oncology",
            MedicalSystem::Ophthalmology => "Ophthalmology",
            MedicalSystem::Otolaryngology => "Otolaryngology",
            MedicalSystem::PainManagementAnesthesia => "Pain_Management_Anesthesia",
            MedicalSystem::PsychiatryBehavioral => "Psychiatry_Behavioral",
            MedicalSystem::Respiratory => "Respiratory",
            MedicalSystem::Rheumatology => "Rheumatology",
            MedicalSystem::ToxicologyEmergency => "Toxicology_Emergency",
            MedicalSystem::Vaccinology => "Vaccinology",
        }
    }

    /// Resolve a canonical tag back to its system, if known.
    pub fn from_tag(tag: &str) -> Option<MedicalSystem> {
        MedicalSystem::ALL.iter().copied().find(|s| s.tag() == tag)
    }

    /// Human-readable name (underscores replaced with spaces).
    pub fn display_name(&self) -> String {
        self.tag().replace('_', " ")
    }
}

// ============================================================================
// Drug Records
// ============================================================================

/// A single medication row from the dataset. Immutable once loaded.
///
/// `pediatric_dose` and `max_dose` are free text; they are the unparsed
/// source of truth for the dose engine. `contraindications` uses the
/// literal string `None` as a no-contraindications sentinel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrugRecord {
    /// Positional synthetic key (`drug-N`), assigned at load time.
    pub id: String,
    pub system: String,
    pub name: String,
    pub drug_class: String,
    pub indication: String,
    pub pediatric_dose: String,
    pub max_dose: String,
    pub dosage_form: String,
    pub route: String,
    pub frequency: String,
    pub contraindications: String,
    pub side_effects: String,
    pub special_notes: String,
}

/// Textual record fields addressable by name, for sorting and facet pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    Name,
    System,
    Class,
    Indication,
    Route,
    DosageForm,
    Frequency,
}

impl DrugRecord {
    /// Borrow the value of a textual field.
    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Name => &self.name,
            RecordField::System => &self.system,
            RecordField::Class => &self.drug_class,
            RecordField::Indication => &self.indication,
            RecordField::Route => &self.route,
            RecordField::DosageForm => &self.dosage_form,
            RecordField::Frequency => &self.frequency,
        }
    }
}

/// The complete loaded drug set. Read-only for the session; reloading
/// means running the loader again and replacing the handle.
#[derive(Clone, Debug, Default)]
pub struct Formulary {
    pub(crate) records: Vec<DrugRecord>,
}

// ============================================================================
// Units
// ============================================================================

/// Patient weight unit.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl FromStr for WeightUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pounds" => Ok(WeightUnit::Lb),
            other => Err(crate::Error::Patient(format!(
                "unrecognized weight unit '{}' (expected kg or lb)",
                other
            ))),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lb => write!(f, "lb"),
        }
    }
}

/// Age unit, carried for display only; never used in dose computation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    Days,
    Months,
    Years,
}

impl FromStr for AgeUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "days" => Ok(AgeUnit::Days),
            "month" | "months" => Ok(AgeUnit::Months),
            "year" | "years" => Ok(AgeUnit::Years),
            other => Err(crate::Error::Patient(format!(
                "unrecognized age unit '{}' (expected days, months, or years)",
                other
            ))),
        }
    }
}

impl fmt::Display for AgeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeUnit::Days => write!(f, "days"),
            AgeUnit::Months => write!(f, "months"),
            AgeUnit::Years => write!(f, "years"),
        }
    }
}

/// Unit of a computed dose.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoseUnit {
    Mg,
    Mcg,
    Units,
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseUnit::Mg => write!(f, "mg"),
            DoseUnit::Mcg => write!(f, "mcg"),
            DoseUnit::Units => write!(f, "units"),
        }
    }
}

// ============================================================================
// Patient and Dose Types
// ============================================================================

/// Per-calculation patient input, constructed fresh by the caller.
///
/// Weight is in the caller's unit and must be positive; callers are
/// responsible for rejecting weights outside (0, 200) before invoking
/// the calculator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatientInput {
    pub weight_value: f64,
    pub weight_unit: WeightUnit,
    pub age: Option<f64>,
    pub age_unit: Option<AgeUnit>,
}

/// A numeric dosing rule extracted from free-text dosing instructions.
///
/// A zero `per_kg_amount` in mg is the defined fallback for text with no
/// recognizable pattern; it means "could not parse", not "zero dose".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseRule {
    pub per_kg_amount: f64,
    pub unit: DoseUnit,
}

/// Output of the dose calculator. Rendered once and discarded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoseCalculationResult {
    pub drug_id: String,
    pub drug_name: String,
    pub patient_weight: f64,
    pub patient_weight_unit: WeightUnit,
    pub computed_dose: f64,
    pub dose_unit: DoseUnit,
    pub frequency: String,
    pub max_dose_exceeded: bool,
    pub max_dose: String,
    pub warnings: Vec<String>,
}

// ============================================================================
// Filter Criteria
// ============================================================================

/// Field to order a record list by.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    System,
    Class,
    Route,
}

impl SortKey {
    /// The record field this key orders by.
    pub fn field(&self) -> RecordField {
        match self {
            SortKey::Name => RecordField::Name,
            SortKey::System => RecordField::System,
            SortKey::Class => RecordField::Class,
            SortKey::Route => RecordField::Route,
        }
    }
}

/// Transient query object for the filter engine.
///
/// `None` on a field means "no constraint on that field"; a `Some` value
/// is an exact-match predicate. Constraints combine conjunctively.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    pub system: Option<String>,
    pub drug_class: Option<String>,
    pub route: Option<String>,
    pub dosage_form: Option<String>,
    pub frequency: Option<String>,
    pub sort_by: Option<SortKey>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            sort_by: Some(SortKey::Name),
            ..Self::unsorted()
        }
    }
}

impl FilterCriteria {
    /// All-wildcard criteria with no sort applied.
    pub fn unsorted() -> Self {
        Self {
            system: None,
            drug_class: None,
            route: None,
            dosage_form: None,
            frequency: None,
            sort_by: None,
        }
    }
}
