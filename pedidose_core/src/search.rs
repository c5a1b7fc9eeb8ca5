//! Search, filtering, sorting, and quick-filter facets over drug records.
//!
//! The standard pipeline narrows with the free-text query first, then
//! applies field filters, then orders the remainder.

use crate::types::{DrugRecord, FilterCriteria, MedicalSystem, SortKey};

/// Case-insensitive substring search across the searchable fields.
///
/// An empty or whitespace-only query is the identity: the input comes
/// back unchanged, order preserved. No tokenization, no ranking.
pub fn search(query: &str, records: &[DrugRecord]) -> Vec<DrugRecord> {
    let query = query.trim();
    if query.is_empty() {
        return records.to_vec();
    }

    let term = query.to_lowercase();
    records
        .iter()
        .filter(|drug| {
            drug.name.to_lowercase().contains(&term)
                || drug.indication.to_lowercase().contains(&term)
                || drug.system.to_lowercase().contains(&term)
                || drug.drug_class.to_lowercase().contains(&term)
                || drug.route.to_lowercase().contains(&term)
                || drug.dosage_form.to_lowercase().contains(&term)
                || drug.frequency.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Apply each non-wildcard constraint as an exact-match predicate
/// (AND across fields), then sort if a sort key is set.
pub fn filter(records: &[DrugRecord], criteria: &FilterCriteria) -> Vec<DrugRecord> {
    let filtered: Vec<DrugRecord> = records
        .iter()
        .filter(|drug| {
            matches_constraint(&criteria.system, &drug.system)
                && matches_constraint(&criteria.drug_class, &drug.drug_class)
                && matches_constraint(&criteria.route, &drug.route)
                && matches_constraint(&criteria.dosage_form, &drug.dosage_form)
                && matches_constraint(&criteria.frequency, &drug.frequency)
        })
        .cloned()
        .collect();

    match criteria.sort_by {
        Some(key) => sort_records(&filtered, key),
        None => filtered,
    }
}

fn matches_constraint(constraint: &Option<String>, value: &str) -> bool {
    match constraint {
        Some(expected) => expected == value,
        None => true,
    }
}

/// Stable sort by the chosen field's lowercased value; ties keep their
/// pre-sort relative order.
pub fn sort_records(records: &[DrugRecord], key: SortKey) -> Vec<DrugRecord> {
    let field = key.field();
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        a.field(field)
            .to_lowercase()
            .cmp(&b.field(field).to_lowercase())
    });
    sorted
}

/// The standard pipeline: query search, then field filters, then sort.
pub fn apply(query: &str, criteria: &FilterCriteria, records: &[DrugRecord]) -> Vec<DrugRecord> {
    filter(&search(query, records), criteria)
}

// ============================================================================
// Quick Filters
// ============================================================================

/// A named shortcut applying a canned filter combination, with a live
/// count over the current record set.
#[derive(Clone, Debug)]
pub struct QuickFilter {
    pub label: &'static str,
    pub count: usize,
    pub criteria: FilterCriteria,
}

/// Facet definitions are data: label, membership predicate, and the
/// criteria fragment applied when the facet is selected.
struct FacetSpec {
    label: &'static str,
    predicate: fn(&DrugRecord) -> bool,
    criteria: fn() -> FilterCriteria,
}

const FACETS: &[FacetSpec] = &[
    FacetSpec {
        label: "Emergency",
        predicate: |d| d.system == MedicalSystem::ToxicologyEmergency.tag(),
        criteria: || FilterCriteria {
            system: Some(MedicalSystem::ToxicologyEmergency.tag().to_string()),
            ..FilterCriteria::unsorted()
        },
    },
    FacetSpec {
        label: "IV Medications",
        predicate: |d| d.route.contains("IV"),
        criteria: || FilterCriteria {
            route: Some("IV".to_string()),
            ..FilterCriteria::unsorted()
        },
    },
    FacetSpec {
        label: "Oral",
        predicate: |d| d.route == "PO",
        criteria: || FilterCriteria {
            route: Some("PO".to_string()),
            ..FilterCriteria::unsorted()
        },
    },
    FacetSpec {
        label: "Antibiotics",
        predicate: |d| d.system == MedicalSystem::InfectiousDiseases.tag(),
        criteria: || FilterCriteria {
            system: Some(MedicalSystem::InfectiousDiseases.tag().to_string()),
            ..FilterCriteria::unsorted()
        },
    },
    FacetSpec {
        label: "Once Daily",
        predicate: |d| d.frequency.contains("Once daily") || d.frequency.contains("daily"),
        criteria: || FilterCriteria {
            frequency: Some("Once daily".to_string()),
            ..FilterCriteria::unsorted()
        },
    },
    FacetSpec {
        label: "Cardiovascular",
        predicate: |d| d.system == MedicalSystem::Cardiovascular.tag(),
        criteria: || FilterCriteria {
            system: Some(MedicalSystem::Cardiovascular.tag().to_string()),
            ..FilterCriteria::unsorted()
        },
    },
];

/// Compute the quick-filter facets over the current record set.
/// Facets with a zero live count are omitted.
pub fn quick_filters(records: &[DrugRecord]) -> Vec<QuickFilter> {
    FACETS
        .iter()
        .filter_map(|facet| {
            let count = records.iter().filter(|d| (facet.predicate)(d)).count();
            if count == 0 {
                None
            } else {
                Some(QuickFilter {
                    label: facet.label,
                    count,
                    criteria: (facet.criteria)(),
                })
            }
        })
        .collect()
}
