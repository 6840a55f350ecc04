use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::state::LedgerState;

/// One recorded income or expense transaction, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub value: f64,
    pub target: SplitTarget,
    pub balances: BucketBalances,
}

/// Wire values stay in the original Spanish (`ingreso`/`gasto`) so persisted
/// documents remain interchangeable with earlier exports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovementKind {
    #[serde(rename = "ingreso")]
    Income,
    #[serde(rename = "gasto")]
    Expense,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementKind::Income => "Ingreso",
            MovementKind::Expense => "Gasto",
        };
        f.write_str(label)
    }
}

/// Where a movement is routed: one named bucket, or the automatic split.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitTarget {
    Auto,
    Ahorro,
    Personales,
    Inversion,
}

impl SplitTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitTarget::Auto => "auto",
            SplitTarget::Ahorro => "ahorro",
            SplitTarget::Personales => "personales",
            SplitTarget::Inversion => "inversion",
        }
    }
}

impl fmt::Display for SplitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a target string names neither a bucket nor `auto`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target `{0}`")]
pub struct UnknownTarget(pub String);

impl FromStr for SplitTarget {
    type Err = UnknownTarget;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "auto" => Ok(SplitTarget::Auto),
            "ahorro" => Ok(SplitTarget::Ahorro),
            "personales" => Ok(SplitTarget::Personales),
            "inversion" => Ok(SplitTarget::Inversion),
            other => Err(UnknownTarget(other.to_string())),
        }
    }
}

// Unrecognized targets collapse to `auto`, the documented routing fallback,
// so old documents with arbitrary target strings keep loading.
impl<'de> Deserialize<'de> for SplitTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(SplitTarget::Auto))
    }
}

/// Snapshot of the three buckets after a movement was applied. Audit record
/// only; current balances are never reconstructed from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BucketBalances {
    pub ahorro: f64,
    pub personales: f64,
    pub inversion: f64,
}

impl From<&LedgerState> for BucketBalances {
    fn from(state: &LedgerState) -> Self {
        Self {
            ahorro: state.ahorro,
            personales: state.personales,
            inversion: state.inversion,
        }
    }
}
