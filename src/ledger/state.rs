use serde::{Deserialize, Serialize};

use super::movement::Movement;

/// Number of movements retained in the rolling history.
pub const HISTORY_CAP: usize = 200;

/// The persisted root object: three bucket balances, the auto-split flag,
/// and the bounded movement history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerState {
    pub ahorro: f64,
    pub personales: f64,
    pub inversion: f64,
    #[serde(rename = "autoSplit")]
    pub auto_split: bool,
    #[serde(default)]
    pub history: Vec<Movement>,
}

impl LedgerState {
    /// Built-in opening balances, used on first run and by `reset`.
    pub fn initial() -> Self {
        Self {
            ahorro: 3092.97,
            personales: 873.12,
            inversion: 948.19,
            auto_split: true,
            history: Vec::new(),
        }
    }

    /// Sum of the three buckets, recomputed on demand and never stored.
    pub fn total(&self) -> f64 {
        round_cents(self.ahorro + self.personales + self.inversion)
    }

    /// Prepends a movement and evicts the oldest entries past the cap.
    pub fn record(&mut self, movement: Movement) {
        self.history.insert(0, movement);
        self.history.truncate(HISTORY_CAP);
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Rounds a monetary amount to 2 fraction digits, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
