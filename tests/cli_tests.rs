//! CLI integration tests
//!
//! These tests run the `xmlschema-structures` binary against the schema
//! fixtures.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn cli_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xmlschema-structures"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let output = Command::new(cli_bin())
        .args(["inspect", &fixture("grades.xsd")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("xmlschema-structures"), "should show version");
    assert!(stdout.contains("Target Namespace: (none)"));
    assert!(stdout.contains("Grades (simple, list) base=anySimpleType"));
    assert!(stdout.contains("Grade (simple, atomic) base=string"));
    assert!(stdout.contains("Empty (complex, restriction) base=anyType content=empty"));
}

#[test]
fn test_cli_inspect_json_output() {
    let output = Command::new(cli_bin())
        .args(["inspect", "--json", &fixture("purchase_order.xsd")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "inspect --json should succeed");

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["targetNamespace"], "http://example.com/po");

    let types = json["types"].as_array().expect("types should be an array");
    let names: Vec<&str> = types.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "PurchaseOrderType",
            "USAddress",
            "Address",
            "Items",
            "Quantity",
            "SKU",
            "Price"
        ]
    );

    let us_address = &types[1];
    assert_eq!(us_address["kind"], "complex");
    assert_eq!(us_address["derivation"], "extension");
    assert_eq!(us_address["base"], "Address");
    assert_eq!(us_address["content"], "element-only");
    assert_eq!(us_address["attributes"], 1);

    let price = &types[6];
    assert_eq!(price["content"], "simple");
    assert_eq!(price["base"], "decimal");
}

#[test]
fn test_cli_inspect_single_type() {
    let output = Command::new(cli_bin())
        .args(["inspect", "--json", "--type", "Quantity", &fixture("purchase_order.xsd")])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("should be valid JSON");
    let types = json["types"].as_array().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["qualifiedName"], "{http://example.com/po}Quantity");
    assert_eq!(types[0]["variety"], "atomic");
    assert_eq!(types[0]["base"], "positiveInteger");
}

#[test]
fn test_cli_inspect_unknown_type() {
    let output = Command::new(cli_bin())
        .args(["inspect", "--type", "Missing", &fixture("grades.xsd")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Type 'Missing' not found in schema"));
}

#[test]
fn test_cli_inspect_reports_cycle() {
    let output = Command::new(cli_bin())
        .args(["inspect", &fixture("cycle.xsd")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Error: unable to resolve type definitions"));
    assert!(stderr.contains('A') && stderr.contains('B'));
}

#[test]
fn test_cli_inspect_missing_file() {
    let output = Command::new(cli_bin())
        .args(["inspect", &fixture("does_not_exist.xsd")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.starts_with("Error:"));
}

#[test]
fn test_cli_verbose_logs_resolution() {
    let output = Command::new(cli_bin())
        .args(["-v", "inspect", &fixture("grades.xsd")])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(stderr.contains("resolution pass"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(cli_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("inspect"));
}
