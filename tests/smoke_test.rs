//! Smoke test to verify the CLI end to end

use std::io::Write;
use std::process::Command;

const MODEL: &str = r##"
id: smurfs
itemDefinitions:
  - name: tSmurf
    itemComponents:
      - name: dob
        typeRef: date
      - name: isBlue
        typeRef: boolean
drgElements:
  - type: inputData
    id: smurf
    name: Smurf
    typeRef: tSmurf
  - type: decision
    id: eligible
    name: Eligible
    typeRef: boolean
    informationRequirements:
      - id: r1
        href: "#smurf"
    expression:
      type: decisionTable
"##;

fn model_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(MODEL.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_dmn-enrich"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn smoke_test_enrich_report() {
    let file = model_file();
    let path = file.path().to_str().unwrap();

    let (ok, stdout) = run(&["enrich", path, "eligible"]);
    assert!(ok);
    assert!(stdout.contains("== Eligible =="));
    assert!(stdout.contains("Smurf.dob"));
    assert!(stdout.contains("Smurf.isBlue"));
}

#[test]
fn smoke_test_enrich_json() {
    let file = model_file();
    let path = file.path().to_str().unwrap();

    let (ok, stdout) = run(&["enrich", path, "eligible", "--json"]);
    assert!(ok);
    let tables: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tables[0]["path"], "Eligible");
    assert_eq!(tables[0]["table"]["output"][0]["name"], "Eligible");
    assert_eq!(tables[0]["table"]["output"][0]["typeRef"], "boolean");
}

#[test]
fn smoke_test_types() {
    let file = model_file();
    let path = file.path().to_str().unwrap();

    let (ok, stdout) = run(&["types", path, "tSmurf", "--as", "s"]);
    assert!(ok);
    let lines: Vec<_> = stdout.lines().map(|l| l.split_whitespace().next().unwrap_or("")).collect();
    assert_eq!(lines, vec!["s.dob", "s.isBlue"]);
}

#[test]
fn smoke_test_unknown_decision_fails() {
    let file = model_file();
    let path = file.path().to_str().unwrap();

    let (ok, _) = run(&["enrich", path, "nope"]);
    assert!(!ok);
}

#[test]
fn smoke_test_schema() {
    let (ok, stdout) = run(&["schema", "config"]);
    assert!(ok);
    let schema: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(schema["properties"]["reference_expansion"].is_object());
}
