// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID_PIPELINE: &str = r#"
id: 3
workspaceId: 1
projectId: 2
name: release
stages:
  - name: build
  - name: unit
    dependsOn: [build]
  - name: lint
    dependsOn: [build]
  - name: ship
    dependsOn: [unit, lint]
"#;

const CYCLIC_PIPELINE: &str = r#"
id: 4
workspaceId: 1
projectId: 2
stages:
  - name: a
    dependsOn: [b]
  - name: b
    dependsOn: [a]
"#;

fn vessel() -> Command {
    let mut cmd = Command::cargo_bin("vessel").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("VESSEL_CONFIG");
    cmd
}

fn write_project(dir: &TempDir) {
    std::fs::write(dir.path().join("pipeline.yaml"), VALID_PIPELINE).unwrap();
    std::fs::write(dir.path().join("cyclic.yaml"), CYCLIC_PIPELINE).unwrap();
    std::fs::write(
        dir.path().join(".vessel.yaml"),
        format!(
            "store:\n  backend: filesystem\n  directory: {}\n",
            dir.path().join("store").display()
        ),
    )
    .unwrap();
}

#[test]
fn validate_accepts_diamond() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    vessel()
        .current_dir(dir.path())
        .args(["validate", "pipeline.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline is valid!"))
        .stdout(predicate::str::contains("build -> unit, lint"));
}

#[test]
fn validate_rejects_cycle() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    vessel()
        .current_dir(dir.path())
        .args(["validate", "cyclic.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Circular dependency").not())
        .stderr(predicate::str::contains("Circular dependency"));
}

#[test]
fn validate_missing_file() {
    let dir = TempDir::new().unwrap();

    vessel()
        .current_dir(dir.path())
        .args(["validate", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pipeline file not found"));
}

#[test]
fn run_then_lookup() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    let output = vessel()
        .current_dir(dir.path())
        .args(["run", "pipeline.yaml", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let version: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = version["id"].as_i64().unwrap();
    assert_eq!(version["pipelineId"], 3);
    assert_eq!(version["status"], 0);
    assert_eq!(version["namespace"], format!("plv-{}", id));

    let stage_file = dir
        .path()
        .join("store/containerops/vessel/ws-1/pj-2/pl-3/stage/ship.json");
    assert!(stage_file.exists());

    vessel()
        .current_dir(dir.path())
        .args(["lookup", "-w", "1", "-p", "2", "-i", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));
}

#[test]
fn run_rejects_cycle_without_writing() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    vessel()
        .current_dir(dir.path())
        .args(["run", "cyclic.yaml"])
        .assert()
        .failure();

    assert!(!dir.path().join("store/containerops").exists());
}

#[test]
fn graph_renders_dot() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    vessel()
        .current_dir(dir.path())
        .args(["graph", "pipeline.yaml", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"build\" -> \"lint\";"))
        .stdout(predicate::str::contains("\"unit\" -> \"ship\";"));
}
