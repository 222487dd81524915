#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Runs `medinotes` against an isolated config directory.
fn medinotes(config: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("medinotes"));
    cmd.env("MEDINOTES_CONFIG_DIR", config.path().as_os_str())
        .env_remove("RUST_LOG");
    cmd
}

const CONSULT_COMPLETE: &str = r#"{
    "patient_name": "John Doe",
    "patient_mrn": "MRN-123456",
    "date_of_consult": "2025-10-20",
    "consulting_service": "Cardiology",
    "reason_for_consult": "Chest pain",
    "history_of_present_illness": "55M with substernal chest pain x 2 hours",
    "assessment": "Possible NSTEMI",
    "recommendations": "Serial troponins",
    "medications": ["Aspirin 81mg daily", "Lisinopril 10mg daily"]
}"#;

#[test]
fn test_types_lists_builtins() {
    let config = TempDir::new().unwrap();
    medinotes(&config)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("consult"))
        .stdout(predicate::str::contains("HANDOFF NOTE"))
        .stdout(predicate::str::contains("OPERATIVE REPORT"));
}

#[test]
fn test_fields_unknown_type_fails() {
    let config = TempDir::new().unwrap();
    medinotes(&config)
        .args(["fields", "discharge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown template type: discharge"));
}

#[test]
fn test_validate_reports_missing_with_exit_code_2() {
    let config = TempDir::new().unwrap();
    let input = config.path().join("partial.json");
    fs::write(&input, r#"{ "patient_name": "John Doe", "patient_mrn": "MRN-123456" }"#).unwrap();

    medinotes(&config)
        .args(["validate", "consult", "--input", input.to_str().unwrap()])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("missing required fields"))
        .stdout(predicate::str::contains("reason_for_consult"));
}

#[test]
fn test_validate_complete_note_from_stdin() {
    let config = TempDir::new().unwrap();
    medinotes(&config)
        .args(["validate", "CONSULT", "--input", "-"])
        .write_stdin(CONSULT_COMPLETE)
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn test_render_to_stdout() {
    let config = TempDir::new().unwrap();
    medinotes(&config)
        .args(["render", "consult", "--input", "-"])
        .write_stdin(CONSULT_COMPLETE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("{}\nCONSULTATION NOTE\n", "=".repeat(80))))
        .stdout(predicate::str::contains("MEDICATIONS:\n- Aspirin 81mg daily\n- Lisinopril 10mg daily\n"))
        .stdout(predicate::str::contains("ALLERGIES").not())
        .stderr(predicate::str::contains("missing").not());
}

#[test]
fn test_render_partial_note_warns_and_writes_file() {
    let config = TempDir::new().unwrap();
    let out = config.path().join("handoff.txt");

    medinotes(&config)
        .args(["render", "handoff", "--input", "-", "--output", out.to_str().unwrap()])
        .write_stdin(r#"{ "patient_name": "Test Patient" }"#)
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("missing required fields: patient_mrn"));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("HANDOFF NOTE"));
    assert!(text.contains("Patient: Test Patient\n"));
    assert!(text.contains("Handoff Date/Time: "));
}

#[test]
fn test_export_snapshot_json() {
    let config = TempDir::new().unwrap();
    let output = medinotes(&config)
        .args(["export", "operative", "--input", "-"])
        .write_stdin(r#"{ "patient_name": "Jane Roe", "nurses": ["RN Lee"] }"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["templateType"], "operative");
    assert_eq!(json["fields"]["patient_name"], "Jane Roe");
    assert_eq!(json["fields"]["nurses"][0], "RN Lee");
    assert!(json["createdAt"].is_string());
}

#[test]
fn test_malformed_input_fails() {
    let config = TempDir::new().unwrap();
    medinotes(&config)
        .args(["render", "consult", "--input", "-"])
        .write_stdin(r#"{ "age": 55 }"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid field values"));
}

#[test]
fn test_user_template_and_settings() {
    let config = TempDir::new().unwrap();
    let templates = config.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("clinic.json"),
        r#"{ "name": "clinic", "title": "CLINIC VISIT", "required": ["reason"], "optional": ["plan"] }"#,
    )
    .unwrap();
    fs::write(
        config.path().join("settings.json"),
        r#"{ "render": { "width": 20, "bullet": "* " } }"#,
    )
    .unwrap();

    medinotes(&config)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("CLINIC VISIT"));

    medinotes(&config)
        .args(["render", "clinic", "--input", "-"])
        .write_stdin(r#"{ "reason": "Rash", "plan": ["Topical steroid", "Recheck 2w"] }"#)
        .assert()
        .success()
        .stdout(format!(
            "{bar}\nCLINIC VISIT\n{bar}\n\nREASON:\nRash\n\nPLAN:\n* Topical steroid\n* Recheck 2w\n",
            bar = "=".repeat(20)
        ));
}

#[test]
fn test_config_init_writes_defaults() {
    let config = TempDir::new().unwrap();
    medinotes(&config)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"templateDirectory\""))
        .stdout(predicate::str::contains("\"width\": 80"));

    assert!(config.path().join("settings.json").exists());
}
