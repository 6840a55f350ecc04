use std::{path::PathBuf, sync::Mutex};

use finance_core::{core::StateManager, storage::JsonStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a state manager backed by a unique directory for each test and
/// returns the directory so the test can reopen or inspect the slots.
pub fn setup_state_manager() -> (StateManager, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonStore::new(base.clone()).expect("create json store backend");
    (StateManager::load(Box::new(store)), base)
}

/// Reopens a manager over an existing base directory, as a fresh process
/// start would.
pub fn reopen_state_manager(base: &PathBuf) -> StateManager {
    let store = JsonStore::new(base.clone()).expect("reopen json store backend");
    StateManager::load(Box::new(store))
}
