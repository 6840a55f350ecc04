//! Facade that coordinates the in-memory state, the services, and the
//! write-behind persistence bridge.

use chrono::Utc;
use tracing::warn;

use crate::core::services::{
    MovementService, ServiceResult, SnapshotService,
};
use crate::ledger::{LedgerState, Movement, MovementKind, Snapshot, SplitTarget};
use crate::storage::{StateStore, SNAPSHOT_KEY, STATE_KEY};
use crate::utils::persistence;

/// Owns the live [`LedgerState`] and snapshot list. Every mutation goes
/// through a service and is followed by a persistence attempt; persistence
/// failures are logged and dropped, so the in-memory state stays
/// authoritative for the session.
pub struct StateManager {
    store: Box<dyn StateStore>,
    state: LedgerState,
    snapshots: Vec<Snapshot>,
}

impl StateManager {
    /// Reads both slots from `store`. Absent or unreadable slots fall back
    /// to the built-in initial state / empty snapshot list.
    pub fn load(store: Box<dyn StateStore>) -> Self {
        let state = match store.get(STATE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(%err, "stored state unreadable, falling back to initial values");
                LedgerState::initial()
            }),
            Ok(None) => LedgerState::initial(),
            Err(err) => {
                warn!(%err, "could not read state slot, falling back to initial values");
                LedgerState::initial()
            }
        };
        let snapshots = match store.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(%err, "stored snapshots unreadable, starting with an empty list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not read snapshot slot, starting with an empty list");
                Vec::new()
            }
        };
        Self {
            store,
            state,
            snapshots,
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Registers a movement and persists the state slot.
    pub fn register_movement(
        &mut self,
        raw_amount: &str,
        kind: MovementKind,
        target: SplitTarget,
    ) -> ServiceResult<Movement> {
        let movement =
            MovementService::register(&mut self.state, raw_amount, kind, target, Utc::now())?;
        self.persist_state();
        Ok(movement)
    }

    /// Flips the auto-split default for future income and returns the new
    /// setting.
    pub fn toggle_auto_split(&mut self) -> bool {
        self.state.auto_split = !self.state.auto_split;
        self.persist_state();
        self.state.auto_split
    }

    /// Restores the built-in initial values, discarding the history.
    pub fn reset(&mut self) {
        self.state = LedgerState::initial();
        self.persist_state();
    }

    /// Captures a named snapshot and persists the snapshot slot.
    pub fn save_snapshot(&mut self, name: &str) -> ServiceResult<Snapshot> {
        let snapshot =
            SnapshotService::create(&mut self.snapshots, &self.state, name, Utc::now())?;
        self.persist_snapshots();
        Ok(snapshot)
    }

    /// Replaces the whole state with the snapshot at `index` (0 = most
    /// recent), including the snapshot's own history. Confirmation happens
    /// at the caller.
    pub fn restore_snapshot(&mut self, index: usize) -> ServiceResult<Snapshot> {
        let restored = SnapshotService::restore(&self.snapshots, index)?;
        let snapshot = self.snapshots[index].clone();
        self.state = restored;
        self.persist_state();
        Ok(snapshot)
    }

    /// Pretty-printed portable document of the current state.
    pub fn export_json(&self) -> ServiceResult<String> {
        Ok(persistence::export_state(&self.state)?)
    }

    /// Replaces the whole state with an imported document. The caller has
    /// already validated the document and confirmed the replacement.
    pub fn replace_state(&mut self, state: LedgerState) {
        self.state = state;
        self.persist_state();
    }

    fn persist_state(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "could not serialize state, slot left unpersisted");
                return;
            }
        };
        if let Err(err) = self.store.set(STATE_KEY, &json) {
            warn!(%err, "could not write state slot, changes kept in memory only");
        }
    }

    fn persist_snapshots(&self) {
        let json = match serde_json::to_string(&self.snapshots) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "could not serialize snapshots, slot left unpersisted");
                return;
            }
        };
        if let Err(err) = self.store.set(SNAPSHOT_KEY, &json) {
            warn!(%err, "could not write snapshot slot, changes kept in memory only");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn manager() -> StateManager {
        StateManager::load(Box::new(MemoryStore::new()))
    }

    #[test]
    fn starts_from_initial_values_when_store_is_empty() {
        let manager = manager();
        assert_eq!(manager.state(), &LedgerState::initial());
        assert!(manager.snapshots().is_empty());
    }

    #[test]
    fn corrupt_slot_falls_back_to_initial_values() {
        let store = MemoryStore::new();
        store.set(STATE_KEY, "{broken").unwrap();
        store.set(SNAPSHOT_KEY, "broken too").unwrap();
        let manager = StateManager::load(Box::new(store));
        assert_eq!(manager.state(), &LedgerState::initial());
        assert!(manager.snapshots().is_empty());
    }

    #[test]
    fn movements_are_persisted_to_the_state_slot() {
        let mut manager = manager();
        manager
            .register_movement("200", MovementKind::Income, SplitTarget::Auto)
            .unwrap();
        let raw = manager.store.get(STATE_KEY).unwrap().expect("slot written");
        let stored: LedgerState = serde_json::from_str(&raw).unwrap();
        assert_eq!(&stored, manager.state());
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut manager = manager();
        let captured = manager.state().clone();
        manager.save_snapshot("corte sep").unwrap();

        manager
            .register_movement("500", MovementKind::Expense, SplitTarget::Ahorro)
            .unwrap();
        assert_ne!(manager.state(), &captured);

        manager.restore_snapshot(0).unwrap();
        assert_eq!(manager.state(), &captured);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut manager = manager();
        assert!(!manager.toggle_auto_split());
        assert!(manager.toggle_auto_split());
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut manager = manager();
        manager
            .register_movement("100", MovementKind::Income, SplitTarget::Ahorro)
            .unwrap();
        manager.reset();
        assert_eq!(manager.state(), &LedgerState::initial());
    }
}
