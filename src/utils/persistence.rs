//! Portable JSON export/import of the full ledger state.

use std::{fs, path::Path};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::services::{ServiceError, ServiceResult};
use crate::errors::LedgerError;
use crate::ledger::LedgerState;

/// Serializes the state as a pretty-printed, round-trippable JSON document.
pub fn export_state(state: &LedgerState) -> Result<String, LedgerError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parses a portable document back into a ledger state. Malformed JSON maps
/// to [`ServiceError::Parse`]; any parseable value that is not an object
/// binding to the state shape maps to [`ServiceError::InvalidShape`].
pub fn import_state(text: &str) -> ServiceResult<LedgerState> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| ServiceError::Parse(err.to_string()))?;
    if !value.is_object() {
        return Err(ServiceError::InvalidShape);
    }
    serde_json::from_value(value).map_err(|_| ServiceError::InvalidShape)
}

/// Writes an export atomically by staging to a temporary file.
pub fn save_state_to_file(state: &LedgerState, path: &Path) -> Result<(), LedgerError> {
    let tmp = path.with_extension("tmp");
    let json = export_state(state)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Reads and validates an exported document from disk.
pub fn load_state_from_file(path: &Path) -> ServiceResult<LedgerState> {
    let data = fs::read_to_string(path).map_err(LedgerError::from)?;
    import_state(&data)
}

/// Default export filename, `finance_state_<ISO8601>.json`.
pub fn default_export_name(now: DateTime<Utc>) -> String {
    format!(
        "finance_state_{}.json",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn export_import_round_trips() {
        let state = LedgerState::initial();
        let text = export_state(&state).unwrap();
        let back = import_state(&text).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = import_state("{not json").expect_err("must fail");
        assert!(matches!(err, ServiceError::Parse(_)));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        for text in ["[1, 2]", "42", "\"hola\"", "null"] {
            let err = import_state(text).expect_err("must fail");
            assert!(matches!(err, ServiceError::InvalidShape));
        }
    }

    #[test]
    fn missing_history_defaults_to_empty() {
        let text = r#"{ "ahorro": 1.0, "personales": 2.0, "inversion": 3.0, "autoSplit": false }"#;
        let state = import_state(text).unwrap();
        assert!(state.history.is_empty());
        assert!(!state.auto_split);
    }

    #[test]
    fn export_name_embeds_the_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 9, 30, 12, 0, 0).unwrap();
        assert_eq!(
            default_export_name(now),
            "finance_state_2025-09-30T12:00:00Z.json"
        );
    }
}
