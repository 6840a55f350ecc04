//! Movement registration: amount sanitization, split routing, history upkeep.

use chrono::{DateTime, Utc};

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{
    round_cents, BucketBalances, LedgerState, Movement, MovementKind, SplitTarget,
};

/// Fixed allocation applied to income routed to the automatic split.
pub const SPLIT_AHORRO: f64 = 0.10;
pub const SPLIT_PERSONALES: f64 = 0.25;
pub const SPLIT_INVERSION: f64 = 0.65;

/// Applies income/expense movements to a [`LedgerState`].
pub struct MovementService;

impl MovementService {
    /// Parses a raw amount the way the original entry form did: every
    /// character other than digits, `.` and `-` is dropped before parsing.
    /// Non-finite and exactly-zero amounts are rejected.
    pub fn parse_amount(raw: &str) -> ServiceResult<f64> {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
            .collect();
        let parsed: f64 = cleaned.parse().map_err(|_| ServiceError::InvalidAmount)?;
        if !parsed.is_finite() || parsed == 0.0 {
            return Err(ServiceError::InvalidAmount);
        }
        Ok(round_cents(parsed))
    }

    /// Registers one movement. Either the amount is rejected and the state is
    /// untouched, or the full mutation succeeds; there is no partial path.
    pub fn register(
        state: &mut LedgerState,
        raw_amount: &str,
        kind: MovementKind,
        target: SplitTarget,
        now: DateTime<Utc>,
    ) -> ServiceResult<Movement> {
        let value = Self::parse_amount(raw_amount)?;
        match kind {
            MovementKind::Income => Self::credit(state, value, target),
            MovementKind::Expense => Self::debit(state, value, target),
        }
        let movement = Movement {
            date: now,
            kind,
            value,
            target,
            balances: BucketBalances::from(&*state),
        };
        state.record(movement.clone());
        Ok(movement)
    }

    fn credit(state: &mut LedgerState, value: f64, target: SplitTarget) {
        match target {
            SplitTarget::Ahorro => state.ahorro = round_cents(state.ahorro + value),
            SplitTarget::Personales => {
                state.personales = round_cents(state.personales + value)
            }
            SplitTarget::Inversion => state.inversion = round_cents(state.inversion + value),
            // Each leg is rounded independently; the legs are not corrected
            // to sum exactly to `value`.
            SplitTarget::Auto => {
                state.ahorro = round_cents(state.ahorro + round_cents(value * SPLIT_AHORRO));
                state.personales =
                    round_cents(state.personales + round_cents(value * SPLIT_PERSONALES));
                state.inversion =
                    round_cents(state.inversion + round_cents(value * SPLIT_INVERSION));
            }
        }
    }

    fn debit(state: &mut LedgerState, value: f64, target: SplitTarget) {
        match target {
            SplitTarget::Ahorro => state.ahorro = round_cents(state.ahorro - value),
            SplitTarget::Inversion => state.inversion = round_cents(state.inversion - value),
            // `personales` doubles as the default sink for untargeted expenses.
            // No overdraft check; balances may go negative.
            SplitTarget::Personales | SplitTarget::Auto => {
                state.personales = round_cents(state.personales - value)
            }
        }
    }
}
