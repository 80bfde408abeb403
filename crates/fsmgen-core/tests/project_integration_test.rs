//! Integration tests for the project → description → machine pipeline
//!
//! Tests use temporary directories with real file fixtures to verify:
//! - Project config loading and defaults
//! - Description files deserializing from YAML and JSON
//! - Validation of whole descriptions into machines
//! - Error handling hierarchy

use fsmgen_core::config::CONFIG_FILE;
use fsmgen_core::{
    CallbackKind, Config, Description, Diagnostic, Error, IdentRole, Machine, validate,
};
use tempfile::TempDir;

/// Helper to create a temporary project directory with standard structure.
///
/// Returns a `TempDir` that automatically cleans up when dropped.
fn setup_project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("machines")).unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), config).unwrap();
    dir
}

fn load_machine(config: &Config, file: &str) -> Result<Machine, Error> {
    let path = config.descriptions_dir().join(file);
    let content = std::fs::read_to_string(path)?;
    let desc: Description = serde_yaml::from_str(&content)?;
    Ok(validate(&desc)?)
}

// =============================================================================
// Complete Pipeline Tests
// =============================================================================

#[test]
fn test_complete_pipeline() {
    let dir = setup_project(
        r#"
name: integration-test
package: machines
"#,
    );

    std::fs::write(
        dir.path().join("machines/order.yaml"),
        r#"
name: Order
init: pending
iface: OrderHooks
states:
  - name: pending
    transitions:
      - event: pay
        to: paid
        condition: paymentCleared
        action: chargeCard
      - event: cancel
        to: cancelled
  - name: paid
    on: onPaid
    transitions:
      - event: ship
        to: shipped
      - event: cancel
        to: cancelled
        action: refund
  - name: shipped
  - name: cancelled
    on: onCancelled
"#,
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.project.name, "integration-test");
    assert_eq!(config.project.package.as_deref(), Some("machines"));
    assert_eq!(config.output_dir(), dir.path().join("src/generated"));

    let machine = load_machine(&config, "order.yaml").unwrap();
    assert_eq!(machine.name, "Order");
    assert_eq!(machine.initial_state().unwrap().constant, "STATE_PENDING");
    assert_eq!(machine.transition_count(), 4);

    // States keep input order, events are sorted
    let states: Vec<_> = machine.states.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(states, vec!["pending", "paid", "shipped", "cancelled"]);
    let events: Vec<_> = machine.events.iter().map(|e| e.constant.as_str()).collect();
    assert_eq!(events, vec!["EVENT_CANCEL", "EVENT_PAY", "EVENT_SHIP"]);

    let callbacks: Vec<_> = machine
        .callbacks()
        .into_iter()
        .map(|c| (c.name, c.kind))
        .collect();
    assert_eq!(
        callbacks,
        vec![
            ("chargeCard".to_string(), CallbackKind::Action),
            ("onCancelled".to_string(), CallbackKind::Action),
            ("onPaid".to_string(), CallbackKind::Action),
            ("paymentCleared".to_string(), CallbackKind::Condition),
            ("refund".to_string(), CallbackKind::Action),
        ]
    );
}

#[test]
fn test_json_description_with_capitalised_keys() {
    let json = r#"{
        "Name": "Light",
        "Init": "off",
        "Package": "",
        "States": [
            {"Name": "off", "Transitions": [{"Event": "flip", "To": "on"}]},
            {"Name": "on", "On": "", "Transitions": [{"Event": "flip", "To": "off"}]}
        ]
    }"#;

    let desc: Description = serde_json::from_str(json).unwrap();
    assert!(desc.package.is_none());
    assert!(desc.states[1].on.is_none());

    let machine = validate(&desc).unwrap();
    assert_eq!(machine.events.len(), 1);
    assert!(!machine.has_iface());
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_missing_config() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
    assert!(err.to_string().contains(CONFIG_FILE));
}

#[test]
fn test_malformed_config() {
    let dir = setup_project("name: [unterminated");
    let err = Config::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn test_config_with_invalid_package() {
    let dir = setup_project("name: p\npackage: not a module\n");
    let err = Config::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid { .. }));
}

#[test]
fn test_invalid_description_reports_everything() {
    let dir = setup_project("name: broken-project\n");
    std::fs::write(
        dir.path().join("machines/broken.yaml"),
        r#"
name: Broken
init: start
iface: BrokenInner
states:
  - name: idle
    transitions:
      - event: go
        to: gone
        condition: ready
      - event: go
      - event: halt
        action: ready
  - name: idle
  - name: running-fast
  - name: running_fast
"#,
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    let err = load_machine(&config, "broken.yaml").unwrap_err();

    let Error::InvalidDescription(diagnostics) = err else {
        panic!("expected InvalidDescription, got {err:?}");
    };
    let diagnostics = diagnostics.into_vec();

    assert!(diagnostics.contains(&Diagnostic::DuplicateState {
        state: "idle".to_string()
    }));
    assert!(diagnostics.contains(&Diagnostic::DuplicateEvent {
        state: "idle".to_string(),
        event: "go".to_string()
    }));
    assert!(diagnostics.contains(&Diagnostic::UnknownInitialState {
        init: "start".to_string()
    }));
    assert!(diagnostics.contains(&Diagnostic::UnknownTargetState {
        state: "idle".to_string(),
        event: "go".to_string(),
        target: "gone".to_string()
    }));
    assert!(diagnostics.contains(&Diagnostic::CallbackKindConflict {
        callback: "ready".to_string()
    }));
    assert!(diagnostics.contains(&Diagnostic::NameClash {
        role: IdentRole::Iface,
        name: "BrokenInner".to_string(),
        generated: "BrokenInner".to_string()
    }));
    assert!(
        diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::ConstantCollision { constant, .. } if constant == "STATE_RUNNING_FAST"))
    );
    assert!(
        !diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::InvalidIdentifier { role: IdentRole::Callback, .. }))
    );
}
