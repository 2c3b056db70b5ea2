// End-to-end smoke tests for the rehydrate and cartesian-map binaries.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn rehydrate_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rehydrate"))
}

fn cartesian_map_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cartesian-map"))
}

#[test]
fn rehydrate_prints_output_path_and_writes_artifact() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("manifest.json"),
        serde_json::to_string(&json!({"metadata": {"capsule_id": "demo"}, "canonical": {}}))?,
    )?;
    fs::write(temp.path().join("canonical.json"), br#"{"x": 1}"#)?;
    let out = temp.path().join("demo.hydrated.json");

    let output = rehydrate_bin()
        .arg(temp.path())
        .arg("--out")
        .arg(&out)
        .arg("--timestamp")
        .arg("2024-01-01T00:00:00Z")
        .arg("--no-update-manifest")
        .output()
        .context("running rehydrate")?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.trim(), out.display().to_string());

    let hydrated: Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
    assert_eq!(hydrated["body"], json!({"x": 1}));
    assert_eq!(hydrated["canonical"]["last_hydrated"], "2024-01-01T00:00:00Z");
    Ok(())
}

#[test]
fn rehydrate_reports_missing_manifest_on_stderr() -> Result<()> {
    let temp = TempDir::new()?;

    let output = rehydrate_bin()
        .arg(temp.path())
        .output()
        .context("running rehydrate against empty dir")?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with("error: Manifest not found:"),
        "stderr was: {stderr}"
    );
    assert!(output.stdout.is_empty(), "no path printed on failure");
    Ok(())
}

#[test]
fn cartesian_map_defaults_to_json() -> Result<()> {
    let output = cartesian_map_bin().output().context("running cartesian-map")?;

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["nodes"].as_array().expect("nodes").len(), 9);
    assert_eq!(value["edges"].as_array().expect("edges").len(), 7);
    Ok(())
}

#[test]
fn cartesian_map_renders_markdown_table() -> Result<()> {
    let output = cartesian_map_bin()
        .arg("--format")
        .arg("markdown")
        .output()
        .context("running cartesian-map --format markdown")?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("| Node | Capsule | Layer | Position | Description |"));
    assert!(stdout.contains("| ssot | capsule.scene.ethereal.v2 | lineage | (0, 2) |"));
    Ok(())
}

#[test]
fn cartesian_map_rejects_unknown_format() -> Result<()> {
    let output = cartesian_map_bin()
        .arg("--format")
        .arg("dot")
        .output()
        .context("running cartesian-map with bad format")?;

    assert!(!output.status.success());
    Ok(())
}
