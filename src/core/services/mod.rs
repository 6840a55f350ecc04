pub mod movement_service;
pub mod snapshot_service;
pub mod summary_service;

pub use movement_service::MovementService;
pub use snapshot_service::SnapshotService;
pub use summary_service::{BucketRow, BucketSummary, SummaryService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Engine-level rejections. None of these is fatal: every failure either
/// no-ops or is reported and the previous state stands.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Amount is not a usable, non-zero number")]
    InvalidAmount,
    #[error("Snapshot name must not be empty")]
    EmptyName,
    #[error("No snapshot at position {0}")]
    SnapshotNotFound(usize),
    #[error("Imported document is not a JSON object")]
    InvalidShape,
    #[error("Malformed JSON: {0}")]
    Parse(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
