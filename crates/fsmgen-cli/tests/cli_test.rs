use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_init_validate_and_compile() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().to_str().unwrap();

    // Init project
    cargo_bin_cmd!("fsmgen")
        .args(["init", project, "--name", "demo"])
        .assert()
        .success();

    // Verify generated files exist
    assert!(dir.path().join("fsmgen.yaml").exists());
    assert!(dir.path().join("machines/example.yaml").exists());

    cargo_bin_cmd!("fsmgen")
        .args(["--config", project, "validate"])
        .assert()
        .success();

    cargo_bin_cmd!("fsmgen")
        .args(["--config", project, "compile"])
        .assert()
        .success();

    let output_path = dir.path().join("src/generated/example.rs");
    assert!(output_path.exists(), "example.rs should exist");

    let source = std::fs::read_to_string(&output_path).unwrap();
    assert!(source.starts_with("// Code generated by fsmgen; DO NOT EDIT."));
    assert!(source.contains("pub struct Runner"));
    assert!(source.contains(r#"pub const STATE_RUNNING: State = State("running");"#));
    assert!(source.contains("onRunning(event, inner.state)"));

    // Second run leaves the file alone
    cargo_bin_cmd!("fsmgen")
        .args(["--config", project, "compile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().to_str().unwrap();

    cargo_bin_cmd!("fsmgen").args(["init", project]).assert().success();
    cargo_bin_cmd!("fsmgen")
        .args(["init", project])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contains"));
}

#[test]
fn test_compile_single_file_with_package() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("door.json");
    std::fs::write(
        &input,
        r#"{
            "name": "Door",
            "init": "closed",
            "iface": "DoorHooks",
            "states": [
                {"name": "closed", "transitions": [{"event": "open", "to": "opened", "condition": "unlocked"}]},
                {"name": "opened", "on": "onOpened"}
            ]
        }"#,
    )
    .unwrap();
    let output = dir.path().join("door.rs");

    cargo_bin_cmd!("fsmgen")
        .current_dir(dir.path())
        .args(["compile", "door.json", "-o", "door.rs", "-p", "doors"])
        .assert()
        .success();

    let source = std::fs::read_to_string(&output).unwrap();
    assert!(source.contains("pub mod doors {"));
    assert!(source.contains("pub trait DoorHooks"));
    assert!(source.contains("unlocked(event, inner.state)"));
}

#[test]
fn test_validate_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.yaml");
    std::fs::write(
        &input,
        r#"
name: Broken
init: nowhere
states:
  - name: idle
    transitions:
      - event: go
        to: missing
  - name: idle
"#,
    )
    .unwrap();

    cargo_bin_cmd!("fsmgen")
        .args(["validate", input.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("init state `nowhere` does not exist"))
        .stdout(predicate::str::contains("duplicate state: `idle`"))
        .stdout(predicate::str::contains("`missing`"))
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn test_compile_invalid_description_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.yaml");
    std::fs::write(&input, "name: Broken\ninit: nowhere\nstates:\n  - name: idle\n").unwrap();

    cargo_bin_cmd!("fsmgen")
        .current_dir(dir.path())
        .args(["compile", "broken.yaml", "-o", "broken.rs"])
        .assert()
        .failure();

    assert!(!dir.path().join("broken.rs").exists());
}

#[test]
fn test_compile_without_project_fails() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("fsmgen")
        .current_dir(dir.path())
        .arg("compile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_validate_rejects_what_compile_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gate.yaml");
    std::fs::write(
        &input,
        r#"
name: Gate
package: not a module
init: shut
iface: GateInner
states:
  - name: shut
    transitions:
      - event: open
        to: shut
"#,
    )
    .unwrap();

    cargo_bin_cmd!("fsmgen")
        .current_dir(dir.path())
        .args(["validate", "gate.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("package name `not a module`"))
        .stdout(predicate::str::contains(
            "interface name `GateInner` clashes with the generated `GateInner`",
        ));

    cargo_bin_cmd!("fsmgen")
        .current_dir(dir.path())
        .args(["compile", "gate.yaml", "-o", "gate.rs"])
        .assert()
        .failure();
    assert!(!dir.path().join("gate.rs").exists());
}

#[test]
fn test_validate_free_callback_shadowing_a_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lamp.yaml");
    std::fs::write(
        &input,
        "name: Lamp\ninit: dark\nstates:\n  - name: dark\n    transitions:\n      - event: toggle\n        action: event\n",
    )
    .unwrap();

    cargo_bin_cmd!("fsmgen")
        .args(["validate", input.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "callback name `event` clashes with the generated `event`",
        ));
}
