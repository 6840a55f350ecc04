mod common;

use common::setup_state_manager;
use finance_core::core::services::ServiceError;
use finance_core::ledger::{LedgerState, MovementKind, SplitTarget};
use finance_core::utils::persistence::{
    default_export_name, import_state, load_state_from_file, save_state_to_file,
};
use tempfile::tempdir;

#[test]
fn export_import_round_trips_deep_equal() {
    let (mut manager, _base) = setup_state_manager();
    manager
        .register_movement("200", MovementKind::Income, SplitTarget::Auto)
        .unwrap();
    manager
        .register_movement("42.42", MovementKind::Expense, SplitTarget::Personales)
        .unwrap();

    let exported = manager.export_json().unwrap();
    let imported = import_state(&exported).unwrap();
    assert_eq!(&imported, manager.state());
}

#[test]
fn file_round_trip_preserves_the_state() {
    let (mut manager, _base) = setup_state_manager();
    manager
        .register_movement("77.70", MovementKind::Income, SplitTarget::Inversion)
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join(default_export_name(chrono::Utc::now()));
    save_state_to_file(manager.state(), &path).unwrap();

    let loaded = load_state_from_file(&path).unwrap();
    assert_eq!(&loaded, manager.state());
}

#[test]
fn export_is_pretty_printed() {
    let state = LedgerState::initial();
    let exported = finance_core::utils::persistence::export_state(&state).unwrap();
    assert!(exported.contains("\n"));
    assert!(exported.contains("\"autoSplit\": true"));
}

#[test]
fn import_rejects_malformed_documents_without_state_change() {
    let (mut manager, _base) = setup_state_manager();
    let before = manager.state().clone();

    let err = import_state("{oops").expect_err("must fail");
    assert!(matches!(err, ServiceError::Parse(_)));
    let err = import_state("[1,2,3]").expect_err("must fail");
    assert!(matches!(err, ServiceError::InvalidShape));

    // The engine state is only replaced after a successful parse and an
    // explicit caller decision; nothing here touched it.
    assert_eq!(manager.state(), &before);
    manager
        .register_movement("1", MovementKind::Income, SplitTarget::Ahorro)
        .unwrap();
}

#[test]
fn replace_state_applies_an_imported_document_wholesale() {
    let (mut manager, _base) = setup_state_manager();
    let text = r#"{
        "ahorro": 10.0,
        "personales": 20.0,
        "inversion": 30.0,
        "autoSplit": false,
        "history": []
    }"#;
    let imported = import_state(text).unwrap();
    manager.replace_state(imported);
    assert_eq!(manager.state().ahorro, 10.0);
    assert_eq!(manager.state().personales, 20.0);
    assert_eq!(manager.state().inversion, 30.0);
    assert!(!manager.state().auto_split);
}
