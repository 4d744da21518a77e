//! End-to-end tests for the `ob` binary.
//!
//! Runs the compiled binary against the built-in catalog and checks the
//! printed statements, including catalog overrides via config file.

use std::process::Command;

use tempfile::TempDir;

fn ob_binary() -> String {
    env!("CARGO_BIN_EXE_ob").to_string()
}

fn run_ob(home: &std::path::Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(ob_binary())
        .env("HOME", home)
        .args(args)
        .output()
        .expect("failed to run ob");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn compute_initial_visit_prints_statement() {
    let temp = TempDir::new().unwrap();
    let (stdout, stderr, ok) = run_ob(temp.path(), &["compute", "--visit", "initial"]);
    assert!(ok, "compute should succeed: {stderr}");

    assert!(stdout.contains("OUTPATIENT STATEMENT"));
    assert!(stdout.contains("First consultation"));
    assert!(stdout.contains("Total points        292"));
    assert!(stdout.contains("Patient charge      880 yen"));
}

#[test]
fn compute_auto_derives_lab_companions() {
    let temp = TempDir::new().unwrap();
    let (stdout, _, ok) = run_ob(
        temp.path(),
        &[
            "compute",
            "--visit",
            "initial",
            "--add",
            "D005",
            "--auto",
        ],
    );
    assert!(ok);
    assert!(stdout.contains("Venous blood sampling"));
    assert!(stdout.contains("Laboratory"));
}

#[test]
fn compute_json_output_is_parseable() {
    let temp = TempDir::new().unwrap();
    let (stdout, _, ok) = run_ob(
        temp.path(),
        &["compute", "--visit", "initial", "--json"],
    );
    assert!(ok);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["total_points"], 292);
    assert_eq!(value["patient_charge"], 880);
}

#[test]
fn compute_rejects_malformed_add() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, ok) = run_ob(
        temp.path(),
        &["compute", "--add", "J000:zero"],
    );
    assert!(!ok);
    assert!(stderr.contains("invalid quantity"));
}

#[test]
fn catalog_listing_and_category_filter() {
    let temp = TempDir::new().unwrap();
    let (stdout, _, ok) = run_ob(temp.path(), &["catalog", "--category", "laboratory"]);
    assert!(ok);
    assert!(stdout.contains("Complete blood count"));
    assert!(!stdout.contains("First consultation"));
}

#[test]
fn config_catalog_override_is_used() {
    let temp = TempDir::new().unwrap();
    let catalog_path = temp.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"[
            {"code": "Z1", "name": "House call", "point_value": 100, "category": "home_care"}
        ]"#,
    )
    .unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!("catalog_path = \"{}\"\n", catalog_path.display()),
    )
    .unwrap();

    let (stdout, stderr, ok) = run_ob(
        temp.path(),
        &[
            "--config",
            config_path.to_str().unwrap(),
            "catalog",
        ],
    );
    assert!(ok, "catalog should succeed: {stderr}");
    assert!(stdout.contains("House call"));
    assert!(!stdout.contains("First consultation"));
}
