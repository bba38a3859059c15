// Allow deprecated APIs (assert_cmd::cargo_bin is deprecated but still works)
#![allow(deprecated)]

use predicates::prelude::*;
use rstest::rstest;
use std::path::{Path, PathBuf};
use assert_cmd::Command;
use tempfile::tempdir;

fn scene_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("scenes")
        .join(format!("{}.json", name))
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("scene-render").unwrap();
    cmd.arg("--no-system-fonts");
    cmd
}

#[rstest]
#[case("png", b"\x89PNG".as_slice())]
#[case("pdf", b"%PDF-".as_slice())]
#[case("svg", b"<?xml".as_slice())]
fn test_render_each_format(
    #[case] ext: &str,
    #[case] magic: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join(format!("square.{}", ext));
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(&output)
        .arg("-s").arg("square")
        .arg("-w").arg("120")
        .assert()
        .success();
    let bytes = std::fs::read(&output)?;
    assert!(bytes.starts_with(magic));
    Ok(())
}

#[cfg(feature = "ps")]
#[test]
fn test_render_postscript() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("square.ps");
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(&output)
        .arg("-s").arg("square")
        .arg("-w").arg("120")
        .assert()
        .success();
    assert!(std::fs::read(&output)?.starts_with(b"%!PS"));
    Ok(())
}

#[cfg(not(feature = "ps"))]
#[test]
fn test_postscript_needs_feature() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("square.ps");
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(&output)
        .arg("-s").arg("square")
        .assert()
        .failure()
        .stderr(predicate::str::contains("`ps` feature"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_height_is_derived_from_aspect_ratio() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("square.svg");
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(&output)
        .arg("-s").arg("square")
        .arg("-w").arg("200")
        .assert()
        .success();
    let svg = std::fs::read_to_string(&output)?;
    assert!(svg.contains(r#"width="200""#));
    assert!(svg.contains(r#"height="100""#));
    Ok(())
}

#[test]
fn test_short_h_is_height() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("wave.svg");
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(&output)
        .arg("-s").arg("wave")
        .arg("-h").arg("50")
        .arg("-w").arg("80")
        .assert()
        .success();
    let svg = std::fs::read_to_string(&output)?;
    assert!(svg.contains(r#"height="50""#));
    assert!(svg.contains("linearGradient"));
    Ok(())
}

#[test]
fn test_format_overrides_extension() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("square.out");
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(&output)
        .arg("-s").arg("square")
        .arg("-f").arg("png")
        .assert()
        .success();
    assert!(std::fs::read(&output)?.starts_with(b"\x89PNG"));
    Ok(())
}

#[test]
fn test_scene_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("stdin.png");
    cli()
        .arg("-o").arg(&output)
        .write_stdin(r#"{"primitive": {"path": [{"kind": "line", "start": {"x": 0, "y": 0}, "segments": [{"linear": {"x": 1, "y": 1}}]}]}}"#)
        .assert()
        .success();
    assert!(output.exists());
    Ok(())
}

#[test]
fn test_list_selections() {
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("--list")
        .assert()
        .success()
        .stdout("square\nwave\n");
}

#[rstest]
#[case("square.bmp")]
#[case("square")]
fn test_unknown_extension_fails(#[case] name: &str) {
    let dir = tempdir().unwrap();
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(dir.path().join(name))
        .arg("-s").arg("square")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output extension"));
    assert!(!dir.path().join(name).exists());
}

#[test]
fn test_unknown_selection_fails() {
    let dir = tempdir().unwrap();
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(dir.path().join("out.png"))
        .arg("-s").arg("circle")
        .assert()
        .failure()
        .stderr(predicate::str::contains("circle").and(predicate::str::contains("square, wave")));
}

#[test]
fn test_collection_needs_selection() {
    let dir = tempdir().unwrap();
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .arg("-o").arg(dir.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("selection is required"));
}

#[test]
fn test_invalid_scene_fails() {
    let dir = tempdir().unwrap();
    cli()
        .arg("-o").arg(dir.path().join("out.png"))
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse scene"));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempdir().unwrap();
    cli()
        .arg("-i").arg(dir.path().join("missing.json"))
        .arg("-o").arg(dir.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_output_is_required() {
    cli()
        .arg("-i").arg(scene_path("shapes"))
        .assert()
        .failure();
}
