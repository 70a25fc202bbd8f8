//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sync_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("openclaw-sync"))
}

fn write_source(dir: &Path) -> PathBuf {
    let source = json!({
        "models": {
            "providers": {
                "ollama": {
                    "baseUrl": "http://127.0.0.1:11434/v1",
                    "apiKey": "ollama-local",
                    "models": [
                        {"id": "alpha:cloud", "name": "Alpha"},
                        {"id": "beta:cloud", "name": "Beta"}
                    ]
                }
            }
        },
        "agents": {
            "defaults": {
                "model": {
                    "primary": "ollama/alpha:cloud",
                    "fallbacks": ["ollama/beta:cloud"]
                },
                "models": {
                    "ollama/alpha:cloud": {"alias": "alpha"},
                    "ollama/beta:cloud": {"alias": "beta"}
                }
            }
        }
    });
    let path = dir.join("ollama-cloud.json");
    fs::write(&path, serde_json::to_string_pretty(&source).expect("render source"))
        .expect("write source");
    path
}

fn write_target(dir: &Path) -> PathBuf {
    let target = json!({
        "foo": "bar",
        "models": {
            "providers": {
                "ollama": {"models": [{"id": "old-model"}]}
            }
        },
        "agents": {
            "defaults": {
                "model": {"primary": "old-primary", "fallbacks": []},
                "models": {"keep/me": {"alias": "keep"}}
            }
        }
    });
    let path = dir.join("openclaw.json");
    fs::write(&path, serde_json::to_string_pretty(&target).expect("render target"))
        .expect("write target");
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read json")).expect("parse json")
}

fn backup_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("bak"))
        .collect()
}

#[test]
fn test_cli_version() {
    let mut cmd = sync_cmd();
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("openclaw-sync"));
}

#[test]
fn test_cli_help_lists_subcommands() {
    let mut cmd = sync_cmd();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_full_merge_replaces_sections_and_preserves_unrelated_keys() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = write_target(tmp.path());

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    let merged = read_json(&target);
    assert_eq!(merged["foo"], json!("bar"));
    assert_eq!(
        merged["models"]["providers"]["ollama"]["models"][0]["id"],
        json!("alpha:cloud")
    );
    assert_eq!(
        merged["agents"]["defaults"]["model"]["primary"],
        json!("ollama/alpha:cloud")
    );
    assert_eq!(
        merged["agents"]["defaults"]["model"]["fallbacks"],
        json!(["ollama/beta:cloud"])
    );
    // Whole-subtree replacement: the pre-existing alias table is gone.
    assert_eq!(
        merged["agents"]["defaults"]["models"],
        json!({
            "ollama/alpha:cloud": {"alias": "alpha"},
            "ollama/beta:cloud": {"alias": "beta"}
        })
    );
}

#[test]
fn test_merge_is_idempotent() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = write_target(tmp.path());

    let run = |expect_marker: &str| {
        let mut cmd = sync_cmd();
        cmd.args([
            "merge",
            "--source",
            source.to_str().expect("utf8 source"),
            "--target",
            target.to_str().expect("utf8 target"),
        ]);
        cmd.assert().success().stdout(predicate::str::contains(expect_marker.to_string()));
    };

    run("updated");
    let after_first = fs::read(&target).expect("read after first");
    run("already up to date");
    let after_second = fs::read(&target).expect("read after second");
    assert_eq!(after_first, after_second);
}

#[test]
fn test_only_models_leaves_agent_sections_alone() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = write_target(tmp.path());

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--only-models",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert().success();

    let merged = read_json(&target);
    assert_eq!(
        merged["models"]["providers"]["ollama"]["models"][0]["id"],
        json!("alpha:cloud")
    );
    // The three agent sections keep their pre-merge values.
    assert_eq!(merged["agents"]["defaults"]["model"]["primary"], json!("old-primary"));
    assert_eq!(merged["agents"]["defaults"]["model"]["fallbacks"], json!([]));
    assert_eq!(merged["agents"]["defaults"]["models"], json!({"keep/me": {"alias": "keep"}}));
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = write_target(tmp.path());
    let original = fs::read(&target).expect("read original");

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--dry-run",
        "--backup",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("would update"))
        .stdout(predicate::str::contains("Dry run complete"));

    assert_eq!(fs::read(&target).expect("read target"), original);
    assert!(backup_files(tmp.path()).is_empty(), "dry run must not create a backup");
}

#[test]
fn test_backup_snapshots_pre_merge_target() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = write_target(tmp.path());
    let pre_merge = read_json(&target);

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--backup",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert().success().stdout(predicate::str::contains("Backup written to"));

    let backups = backup_files(tmp.path());
    assert_eq!(backups.len(), 1, "exactly one backup expected");
    assert_eq!(read_json(&backups[0]), pre_merge);

    // And the target itself moved on.
    let merged = read_json(&target);
    assert_eq!(merged["agents"]["defaults"]["model"]["primary"], json!("ollama/alpha:cloud"));
}

#[test]
fn test_missing_target_becomes_pure_insertion() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = tmp.path().join("fresh").join("openclaw.json");

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert().success().stdout(predicate::str::contains("created"));

    let merged = read_json(&target);
    let top_level: Vec<String> = merged.as_object().expect("object").keys().cloned().collect();
    assert_eq!(top_level, vec!["agents".to_string(), "models".to_string()]);
    assert_eq!(
        merged["models"]["providers"]["ollama"]["models"][1]["id"],
        json!("beta:cloud")
    );
}

#[test]
fn test_conflicting_scope_flags_rejected_without_writes() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());
    let target = write_target(tmp.path());
    let original = fs::read(&target).expect("read original");

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--only-models",
        "--only-agents",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("mutually exclusive"));

    assert_eq!(fs::read(&target).expect("read target"), original);
    assert!(backup_files(tmp.path()).is_empty());
}

#[test]
fn test_malformed_source_rejected_before_touching_target() {
    let tmp = TempDir::new().expect("tmp");
    let source = tmp.path().join("broken.json");
    fs::write(&source, "{\"models\": ").expect("write broken source");
    let target = write_target(tmp.path());
    let original = fs::read(&target).expect("read original");

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("broken.json"));

    assert_eq!(fs::read(&target).expect("read target"), original);
}

#[test]
fn test_missing_source_is_not_found() {
    let tmp = TempDir::new().expect("tmp");
    let target = write_target(tmp.path());

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--source",
        tmp.path().join("absent.json").to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_section_missing_in_source_warns_but_succeeds() {
    let tmp = TempDir::new().expect("tmp");
    let source = tmp.path().join("partial.json");
    fs::write(
        &source,
        serde_json::to_string_pretty(&json!({
            "models": {"providers": {"ollama": {"models": [{"id": "alpha:cloud"}]}}}
        }))
        .expect("render partial source"),
    )
    .expect("write partial source");
    let target = write_target(tmp.path());

    let mut cmd = sync_cmd();
    cmd.args([
        "merge",
        "--source",
        source.to_str().expect("utf8 source"),
        "--target",
        target.to_str().expect("utf8 target"),
    ]);
    cmd.assert().success().stdout(predicate::str::contains("skipped"));

    // The agent sections survive untouched.
    let merged = read_json(&target);
    assert_eq!(merged["agents"]["defaults"]["model"]["primary"], json!("old-primary"));
}

#[test]
fn test_status_fails_fast_when_daemon_unreachable() {
    let tmp = TempDir::new().expect("tmp");
    let source = write_source(tmp.path());

    // Port 9 (discard) is about as reliably closed as it gets.
    let mut cmd = sync_cmd();
    cmd.args([
        "status",
        "--source",
        source.to_str().expect("utf8 source"),
        "--base-url",
        "http://127.0.0.1:9",
        "--timeout-secs",
        "1",
    ]);
    cmd.assert().failure().code(4).stderr(predicate::str::contains("daemon"));
}
