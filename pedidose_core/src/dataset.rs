//! Drug dataset loading.
//!
//! The dataset is a comma-separated text table with a fixed 12-column
//! positional schema. The first line is a header and is skipped without
//! validation; quoted fields may contain commas; every field is trimmed.

use crate::{DrugRecord, Error, Formulary, RecordField, Result};
use std::path::Path;

/// Positional column order of the dataset. The header line is ignored,
/// so this order is a strict contract with the data file.
const COLUMNS: usize = 12;

/// Load and parse the dataset file at `path`.
///
/// An unreadable file is a terminal failure for the session's data
/// availability; no partial dataset is returned.
pub fn load_from_path(path: &Path) -> Result<Formulary> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Dataset(format!("failed to read dataset {:?}: {}", path, e)))?;

    let formulary = load_from_str(&raw)?;
    tracing::info!("Loaded {} drug records from {:?}", formulary.len(), path);
    Ok(formulary)
}

/// Parse raw dataset text into a formulary.
///
/// Row ids are positional (`drug-N`, 1-based over non-blank data rows)
/// and are assigned before the retention filter, so dropped rows leave
/// gaps rather than renumbering their successors.
pub fn load_from_str(raw: &str) -> Result<Formulary> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or("").to_string();

        let record = DrugRecord {
            id: format!("drug-{}", index + 1),
            system: field(0),
            name: field(1),
            drug_class: field(2),
            indication: field(3),
            pediatric_dose: field(4),
            max_dose: field(5),
            dosage_form: field(6),
            route: field(7),
            frequency: field(8),
            contraindications: field(9),
            side_effects: field(10),
            special_notes: field(11),
        };

        if row.len() > COLUMNS {
            tracing::debug!(
                "Row {} has {} fields, ignoring the extras",
                index + 1,
                row.len()
            );
        }

        // A record is retained only if both name and system parsed non-empty.
        if record.name.is_empty() || record.system.is_empty() {
            tracing::debug!("Dropping malformed dataset row {}", index + 1);
            dropped += 1;
            continue;
        }

        records.push(record);
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} malformed dataset rows", dropped);
    }

    Ok(Formulary::new(records))
}

impl Formulary {
    pub fn new(records: Vec<DrugRecord>) -> Self {
        Self { records }
    }

    /// All retained records, in dataset order.
    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its positional id (`drug-N`).
    pub fn get(&self, id: &str) -> Option<&DrugRecord> {
        self.records.iter().find(|d| d.id == id)
    }

    /// Look up a record by exact name, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&DrugRecord> {
        self.records.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a user-supplied key as an id first, then as a name.
    pub fn resolve(&self, key: &str) -> Option<&DrugRecord> {
        self.get(key).or_else(|| self.find_by_name(key))
    }

    /// Sorted, deduplicated non-empty values of a field across the set.
    /// Feeds filter pickers in the rendering layer.
    pub fn unique_values(&self, field: RecordField) -> Vec<String> {
        let mut values: Vec<String> = self
            .records
            .iter()
            .map(|d| d.field(field).to_string())
            .filter(|v| !v.is_empty())
            .collect();
        values.sort();
        values.dedup();
        values
    }
}
