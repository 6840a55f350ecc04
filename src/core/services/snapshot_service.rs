//! Named save points: create with cap eviction, restore by list position.

use chrono::{DateTime, Utc};

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{LedgerState, Snapshot, SNAPSHOT_CAP};

/// Manages the most-recent-first snapshot list.
pub struct SnapshotService;

impl SnapshotService {
    /// Captures a full copy of the current state under `name`. Empty or
    /// whitespace-only names are rejected without touching the list.
    pub fn create(
        snapshots: &mut Vec<Snapshot>,
        state: &LedgerState,
        name: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Snapshot> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let snapshot = Snapshot {
            name: name.to_string(),
            date: now,
            state: state.clone(),
        };
        snapshots.insert(0, snapshot.clone());
        snapshots.truncate(SNAPSHOT_CAP);
        Ok(snapshot)
    }

    /// Returns the stored state at `index` (0 = most recent). The caller is
    /// responsible for confirmation before replacing the live state.
    pub fn restore(snapshots: &[Snapshot], index: usize) -> ServiceResult<LedgerState> {
        snapshots
            .get(index)
            .map(|snapshot| snapshot.state.clone())
            .ok_or(ServiceError::SnapshotNotFound(index))
    }
}
