//! Integration tests for the pedidose binary.
//!
//! These tests verify end-to-end behavior including:
//! - Dataset loading and malformed-row handling
//! - Search, filter, and facet listing
//! - Dose calculation and boundary validation
//! - Favorites and recently-viewed persistence

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "System,Name,Class,Indication,Pediatric_Dose,Max_Dose,Dosage_Form,Route,Frequency,Contraindications,Side_Effects,Special_Notes";

/// Helper to create a test data directory with a small dataset
fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = temp_dir.path().join("drugs.csv");

    let rows = [
        HEADER,
        "Infectious_Diseases,Amoxicillin,Penicillin antibiotic,\"Otitis media, pneumonia\",40-50 mg/kg/day,2000 mg,Suspension,PO,Twice daily,Penicillin allergy,\"Diarrhea, rash\",Take with food",
        "Infectious_Diseases,Ceftriaxone,Cephalosporin,Meningitis,50-100 mg/kg/day,4000 mg,Injection,IV,Once daily,Hyperbilirubinemic neonates,Injection site pain,",
        "Cardiovascular,Digoxin,Cardiac glycoside,Heart failure,8-12 mcg/kg,250 mcg,Solution,PO,Once daily,Ventricular fibrillation,Bradycardia,Monitor serum levels",
        "Toxicology_Emergency,Epinephrine,Adrenergic agonist,Anaphylaxis,0.01 mg/kg,0.5 mg,Injection,IM,As needed,None,Tachycardia,",
        "Respiratory,Prednisolone,Corticosteroid,Asthma exacerbation,as directed,—,Solution,PO,Once daily,None,Mood changes,",
        ",Orphan,Unknown,No system row,10 mg/kg,,Tablet,PO,Daily,None,,",
    ];
    fs::write(&dataset, rows.join("\n")).expect("Failed to write dataset");

    (temp_dir, dataset)
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pedidose"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Pediatric drug reference and dose calculator",
        ));
}

#[test]
fn test_list_shows_all_retained_rows() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Amoxicillin"))
        .stdout(predicate::str::contains("5 of 5 drugs"));
}

#[test]
fn test_malformed_row_is_dropped() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Orphan").not());
}

#[test]
fn test_quoted_field_survives_loading() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--query")
        .arg("amoxicillin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Otitis media, pneumonia"));
}

#[test]
fn test_query_narrows_list() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--query")
        .arg("meningitis")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ceftriaxone"))
        .stdout(predicate::str::contains("1 of 5 drugs"));
}

#[test]
fn test_filters_are_conjunctive() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--system")
        .arg("Infectious_Diseases")
        .arg("--route")
        .arg("PO")
        .assert()
        .success()
        .stdout(predicate::str::contains("Amoxicillin"))
        .stdout(predicate::str::contains("Ceftriaxone").not());
}

#[test]
fn test_facets_show_live_counts() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--facets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Emergency (1)"))
        .stdout(predicate::str::contains("Antibiotics (2)"))
        .stdout(predicate::str::contains("IV Medications (1)"));
}

#[test]
fn test_dose_calculation_averages_range() {
    let (temp_dir, dataset) = setup_test_dir();

    // 40-50 mg/kg/day averages to 45, times 10 kg.
    cli()
        .arg("dose")
        .arg("Amoxicillin")
        .arg("--weight")
        .arg("10")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("450.00 mg per dose"))
        .stdout(predicate::str::contains("Contraindications: Penicillin allergy"))
        .stdout(predicate::str::contains("Special Notes: Take with food"));
}

#[test]
fn test_dose_accepts_pounds() {
    let (temp_dir, dataset) = setup_test_dir();

    // 22 lb is 9.979 kg; 45 mg/kg gives 449.06 mg.
    cli()
        .arg("dose")
        .arg("Amoxicillin")
        .arg("--weight")
        .arg("22")
        .arg("--unit")
        .arg("lb")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("449.06 mg per dose"))
        .stdout(predicate::str::contains("22 lb"));
}

#[test]
fn test_dose_exceeding_maximum_warns() {
    let (temp_dir, dataset) = setup_test_dir();

    // 45 mg/kg at 50 kg is 2250 mg, over the 2000 mg ceiling.
    cli()
        .arg("dose")
        .arg("Amoxicillin")
        .arg("--weight")
        .arg("50")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("exceeds maximum"));
}

#[test]
fn test_unparseable_dose_text_reports_no_rule() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("dose")
        .arg("Prednisolone")
        .arg("--weight")
        .arg("10")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0.00 mg per dose"))
        .stdout(predicate::str::contains(
            "No per-kilogram rule could be read",
        ));
}

#[test]
fn test_dose_rejects_out_of_domain_weight() {
    let (temp_dir, dataset) = setup_test_dir();

    for weight in ["0", "-4", "200", "250"] {
        cli()
            .arg("dose")
            .arg("Amoxicillin")
            .arg(format!("--weight={}", weight))
            .arg("--dataset")
            .arg(&dataset)
            .arg("--data-dir")
            .arg(temp_dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("weight must be greater than 0"));
    }
}

#[test]
fn test_dose_rejects_unknown_unit() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("dose")
        .arg("Amoxicillin")
        .arg("--weight")
        .arg("10")
        .arg("--unit")
        .arg("stone")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized weight unit"));
}

#[test]
fn test_unknown_drug_fails() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("dose")
        .arg("Warfarin")
        .arg("--weight")
        .arg("10")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no drug found"));
}

#[test]
fn test_missing_dataset_is_terminal() {
    let temp_dir = tempfile::tempdir().unwrap();

    cli()
        .arg("list")
        .arg("--dataset")
        .arg(temp_dir.path().join("missing.csv"))
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read dataset"));
}

#[test]
fn test_info_by_positional_id() {
    let (temp_dir, dataset) = setup_test_dir();

    // Digoxin is the third data row.
    cli()
        .arg("info")
        .arg("drug-3")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Digoxin"))
        .stdout(predicate::str::contains("8-12 mcg/kg"));
}

#[test]
fn test_favorite_toggle_persists() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("favorite")
        .arg("Digoxin")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Digoxin to favorites"));

    cli()
        .arg("favorites")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Digoxin"));

    // Second toggle removes it again.
    cli()
        .arg("favorite")
        .arg("Digoxin")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed Digoxin from favorites"));

    cli()
        .arg("favorites")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No favorite drugs yet"));
}

#[test]
fn test_viewing_marks_recent_and_clear_empties() {
    let (temp_dir, dataset) = setup_test_dir();

    cli()
        .arg("info")
        .arg("Epinephrine")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("recent")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Epinephrine"));

    cli()
        .arg("recent")
        .arg("--clear")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared recently viewed"));

    cli()
        .arg("recent")
        .arg("--dataset")
        .arg(&dataset)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No recently viewed drugs"));
}

#[test]
fn test_systems_lists_all_tags() {
    cli()
        .arg("systems")
        .assert()
        .success()
        .stdout(predicate::str::contains("Toxicology_Emergency"))
        .stdout(predicate::str::contains("Vaccinology"));
}
