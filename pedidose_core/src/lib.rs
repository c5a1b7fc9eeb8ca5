#![forbid(unsafe_code)]

//! Core domain model and business logic for the PediDose system.
//!
//! This crate provides:
//! - Domain types (drug records, patients, dose rules, filter criteria)
//! - Dataset loading
//! - Dose rule parsing, max-dose checking, and dose calculation
//! - Search, filtering, sorting, and quick-filter facets
//! - Settings and configuration persistence

pub mod types;
pub mod error;
pub mod dataset;
pub mod units;
pub mod dose;
pub mod search;
pub mod settings;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use dataset::{load_from_path, load_from_str};
pub use dose::{calculate_dose, check_max_dose, parse_dose_rule};
pub use search::{filter, quick_filters, search, sort_records, QuickFilter};
pub use settings::AppSettings;
pub use units::{convert_weight, to_kilograms};
