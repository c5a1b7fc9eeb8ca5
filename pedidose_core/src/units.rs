//! Weight and dose unit conversions.
//!
//! Pure, total functions: conversion never fails, and converting between
//! identical units is the identity.

use crate::types::{DoseUnit, WeightUnit};

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.20462;
/// Kilograms per pound.
pub const KG_PER_LB: f64 = 0.453592;

/// Convert a weight between kilograms and pounds.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Kg, WeightUnit::Lb) => value * LB_PER_KG,
        (WeightUnit::Lb, WeightUnit::Kg) => value * KG_PER_LB,
        _ => value,
    }
}

/// Normalize a weight to kilograms. All dose rules are per-kilogram, so
/// this runs before every dose multiplication.
pub fn to_kilograms(value: f64, unit: WeightUnit) -> f64 {
    convert_weight(value, unit, WeightUnit::Kg)
}

/// Rescale a dose amount between mg and mcg (1000x in either direction).
/// Any other unit pairing is returned unchanged.
pub fn scale_dose(value: f64, from: DoseUnit, to: DoseUnit) -> f64 {
    match (from, to) {
        (DoseUnit::Mg, DoseUnit::Mcg) => value * 1000.0,
        (DoseUnit::Mcg, DoseUnit::Mg) => value / 1000.0,
        _ => value,
    }
}
