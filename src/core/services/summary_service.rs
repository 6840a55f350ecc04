//! Derived, read-only views over the ledger state.

use crate::ledger::{LedgerState, Movement};

/// One bucket row in the balance summary.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketRow {
    pub label: &'static str,
    pub balance: f64,
}

/// Formatted-ready balance overview with the recomputed total.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub rows: Vec<BucketRow>,
    pub total: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Builds the three-bucket overview. The total is always recomputed from
    /// the current buckets, never read from storage.
    pub fn buckets(state: &LedgerState) -> BucketSummary {
        BucketSummary {
            rows: vec![
                BucketRow {
                    label: "Ahorro / Emergencias",
                    balance: state.ahorro,
                },
                BucketRow {
                    label: "Gastos Personales",
                    balance: state.personales,
                },
                BucketRow {
                    label: "Inversión / Negocio",
                    balance: state.inversion,
                },
            ],
            total: state.total(),
        }
    }

    /// The most recent movements, newest first.
    pub fn recent(state: &LedgerState, limit: usize) -> &[Movement] {
        &state.history[..limit.min(state.history.len())]
    }
}
