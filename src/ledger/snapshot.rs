use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::LedgerState;

/// Number of named snapshots retained, oldest evicted first.
pub const SNAPSHOT_CAP: usize = 50;

/// A manually named, fully independent copy of the entire ledger state.
/// Never mutated after creation; removed only by cap eviction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub name: String,
    pub date: DateTime<Utc>,
    pub state: LedgerState,
}
