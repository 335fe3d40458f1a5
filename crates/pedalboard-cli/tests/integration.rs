//! Integration tests for pedalboard-cli.
//!
//! Every test runs the binary against its own temporary store so nothing
//! touches the user's configuration directory.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run `pedalboard` with `args` against the store in `temp`.
fn pedalboard(temp: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pedalboard"))
        .arg("--config")
        .arg(temp.path().join("config.toml"))
        .arg("--store")
        .arg(temp.path().join("store"))
        .args(args)
        .output()
        .expect("failed to run pedalboard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn store_file(temp: &TempDir) -> PathBuf {
    temp.path()
        .join("store")
        .join("default")
        .join("presets.json")
}

#[test]
fn cli_units_lists_builtins() {
    let temp = TempDir::new().unwrap();
    let output = pedalboard(&temp, &["units"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Available Units"));
    for unit in ["gain", "overdrive", "delay", "reverb", "tremolo", "limiter"] {
        assert!(out.contains(unit), "listing should contain '{unit}'");
    }
}

#[test]
fn cli_units_keyword_filter_and_details() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&pedalboard(&temp, &["units", "--keyword", "echo"]));
    assert!(out.contains("delay"));
    assert!(!out.contains("overdrive"));

    let out = stdout(&pedalboard(&temp, &["units", "reverb"]));
    assert!(out.contains("Parameters:"));
    assert!(out.contains("room / hall / plate"));

    assert!(!pedalboard(&temp, &["units", "kazoo"]).status.success());
}

#[test]
fn cli_store_is_seeded_with_factory_presets() {
    let temp = TempDir::new().unwrap();
    let output = pedalboard(&temp, &["banks", "list"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Factory"));
    assert!(store_file(&temp).is_file());
}

#[test]
fn cli_save_show_and_inspect() {
    let temp = TempDir::new().unwrap();
    let output = pedalboard(
        &temp,
        &[
            "presets",
            "save",
            "lead",
            "clean",
            "--chain",
            "gain:gain=6|overdrive:drive=0.7",
            "--level",
            "0.8",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let out = stdout(&pedalboard(&temp, &["presets", "list", "lead"]));
    assert!(out.contains("gain -> overdrive"));

    let json = stdout(&pedalboard(&temp, &["presets", "show", "lead", "clean", "--json"]));
    let snapshot: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot["outputLevel"], 0.8);
    assert_eq!(snapshot["units"][1]["type"], "overdrive");
    assert_eq!(snapshot["units"][1]["nativeState"]["drive"], 0.7);

    let out = stdout(&pedalboard(&temp, &["chain", "params", "lead", "clean"]));
    assert!(out.contains("Mix"));
    assert!(out.contains("5 parameter(s)"));
}

#[test]
fn cli_save_rejects_unknown_parameter() {
    let temp = TempDir::new().unwrap();
    let output = pedalboard(
        &temp,
        &["presets", "save", "lead", "bad", "--chain", "gain:volume=3"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no parameter 'volume'"));
}

#[test]
fn cli_bank_deletion_rule() {
    let temp = TempDir::new().unwrap();
    assert!(pedalboard(&temp, &["banks", "create", "set"]).status.success());
    assert!(pedalboard(&temp, &["presets", "create", "set", "intro"]).status.success());

    let output = pedalboard(&temp, &["banks", "delete", "set"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("still holds"));

    assert!(pedalboard(&temp, &["presets", "delete", "set", "intro"]).status.success());
    assert!(pedalboard(&temp, &["banks", "delete", "set"]).status.success());
    assert!(!stdout(&pedalboard(&temp, &["banks", "list"])).contains("set "));
}

#[test]
fn cli_rename_collision_is_rejected() {
    let temp = TempDir::new().unwrap();
    assert!(pedalboard(&temp, &["banks", "create", "a"]).status.success());
    assert!(pedalboard(&temp, &["banks", "create", "b"]).status.success());
    assert!(!pedalboard(&temp, &["banks", "rename", "a", "b"]).status.success());
    assert!(!pedalboard(&temp, &["banks", "rename", "a", "  "]).status.success());
    assert!(pedalboard(&temp, &["banks", "rename", "a", "c"]).status.success());
    let out = stdout(&pedalboard(&temp, &["banks", "list"]));
    assert!(out.contains("c "));
    assert!(out.contains("b "));
}

#[test]
fn cli_inspect_reports_latency() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&pedalboard(&temp, &["chain", "inspect", "limiter|gain"]));
    assert!(out.contains("latency 64 samples"));
}
