//! End-to-end tests driving the ratecard binaries.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const LISTING: &str = "\
1. Amex Gold
4%
Dining
1%
Everywhere
2. Discover It
5%
Gas
";

const REFERENCE: &str = "\
Card Name,Dining,Gas,Everywhere
Amex Gold,3,0,1
Citi Double Cash,,,2
";

const REFERENCE_FILE: &str = "card_rewards_matrix_refinedsix.csv";

fn run(bin: &str, root: &Path, args: &[&str]) -> Output {
    Command::new(bin)
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RATECARD_LOG")
        .output()
        .expect("failed to run binary")
}

fn extract(root: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_ratecard-extract"), root, args)
}

fn lookup(root: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_ratecard-lookup"), root, args)
}

fn merge(root: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_ratecard-merge"), root, args)
}

fn project(listing: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tempcards.txt"), listing).unwrap();
    fs::write(dir.path().join(REFERENCE_FILE), REFERENCE).unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_extract_writes_artifacts() {
    let dir = project(LISTING);
    let output = extract(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Found 2 cards in listing"), "{out}");
    assert!(out.contains("Found 2 cards in reference"), "{out}");
    assert!(out.contains("Created 2 JSON files"), "{out}");
    assert!(out.contains("Found in reference: 1"), "{out}");
    assert!(out.contains("Not found in reference: 1"), "{out}");
    assert!(stderr(&output).contains("warning: Card not found in reference: Discover It"));

    let gold = fs::read_to_string(dir.path().join("card_json_output/Amex_Gold.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&gold).unwrap();
    assert_eq!(json["card"], "Amex Gold");
    assert_eq!(json["in_csv"], true);
    assert_eq!(json["rewards"]["Dining"], "4.0%");
    assert_eq!(json["rewards"]["Everywhere"], "1.0%");

    let discover =
        fs::read_to_string(dir.path().join("card_json_output/Discover_It.json")).unwrap();
    assert!(discover.contains("\"in_csv\": false"));
}

#[test]
fn test_extract_missing_listing() {
    let dir = tempfile::tempdir().unwrap();
    let output = extract(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("file not found"));
}

#[test]
fn test_extract_empty_listing() {
    let dir = project("");
    let output = extract(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("save it first"));
}

#[test]
fn test_extract_whitespace_listing() {
    let dir = project("  \n\n");
    let output = extract(dir.path(), &[]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("warning:"));
    assert!(stdout(&output).contains("Found 0 cards in listing"));
}

#[test]
fn test_extract_listing_override() {
    let dir = project("");
    let other = dir.path().join("other.txt");
    fs::write(&other, "1. Amex Gold 4%\nDining\n").unwrap();
    let output = extract(dir.path(), &["--listing", other.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Found 1 cards in listing"));
}

#[test]
fn test_lookup_exact() {
    let dir = project(LISTING);
    let output = lookup(dir.path(), &["amex", "gold"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("Card: Amex Gold\n"), "{out}");
    assert!(out.contains("  Dining: 3.0%"), "{out}");
    assert!(!out.contains("Gas"), "{out}");
    assert!(out.contains("Baseline (Everywhere): 1.0%"), "{out}");
    assert!(out.contains("Total reward categories: 2"), "{out}");
}

#[test]
fn test_lookup_partial() {
    let dir = project(LISTING);
    let output = lookup(dir.path(), &["Double Cash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Card: Citi Double Cash"));
}

#[test]
fn test_lookup_unknown_card() {
    let dir = project(LISTING);
    let output = lookup(dir.path(), &["Discover It"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Card not found: Discover It"));
}

#[test]
fn test_lookup_without_name() {
    let dir = project(LISTING);
    let output = lookup(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn test_lookup_without_reference() {
    let dir = tempfile::tempdir().unwrap();
    let output = lookup(dir.path(), &["Amex Gold"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Checked:"));
    assert!(err.contains("Core/Resources/card_rewards_matrix.csv"));
}

#[test]
fn test_extract_then_merge() {
    let dir = project(LISTING);
    assert!(extract(dir.path(), &[]).status.success());

    let output = merge(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Loaded 2 cards"), "{out}");
    assert!(out.contains("Updated 1 cards in"), "{out}");
    assert!(out.contains("1 cards not found"), "{out}");

    let err = stderr(&output);
    assert!(err.contains("warning: File not found:"), "{err}");
    assert!(err.contains("scraper"), "{err}");

    let table = fs::read_to_string(dir.path().join(REFERENCE_FILE)).unwrap();
    assert!(table.contains("Amex Gold,4.0,1.0,1.0"), "{table}");
    assert!(table.contains("Citi Double Cash,,,2"), "{table}");
}

#[test]
fn test_merge_without_artifacts() {
    let dir = project(LISTING);
    let output = merge(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: failed to load artifacts"));
}

#[test]
fn test_config_file() {
    let dir = project("");
    fs::create_dir(dir.path().join("incoming")).unwrap();
    fs::write(dir.path().join("incoming/cards.txt"), LISTING).unwrap();
    let config = dir.path().join("ratecard.json");
    fs::write(
        &config,
        r#"{"listing": "incoming/cards.txt", "output_dir": "artifacts"}"#,
    )
    .unwrap();

    let output = extract(dir.path(), &["--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("artifacts/Amex_Gold.json").exists());
}
