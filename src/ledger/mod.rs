//! Domain types for the three-bucket ledger: the persisted state, recorded
//! movements, and named snapshots. Data only; routing rules live in the
//! service layer.

pub mod movement;
pub mod snapshot;
pub mod state;

pub use movement::{BucketBalances, Movement, MovementKind, SplitTarget, UnknownTarget};
pub use snapshot::{Snapshot, SNAPSHOT_CAP};
pub use state::{round_cents, LedgerState, HISTORY_CAP};
