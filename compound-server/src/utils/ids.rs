//! Record id parsing shared by the engine and the API layer

use shared::{AppError, AppResult, ErrorCode};
use surrealdb::RecordId;

pub fn parse_medicine_id(id: &str) -> AppResult<RecordId> {
    parse_record_id(id, "medicine", ErrorCode::OrderNotFound)
}

pub fn parse_substance_id(id: &str) -> AppResult<RecordId> {
    parse_record_id(id, "substance", ErrorCode::SubstanceNotFound)
}

pub fn parse_account_id(id: &str) -> AppResult<RecordId> {
    parse_record_id(id, "account", ErrorCode::AccountNotFound)
}

/// Parse "table:key" or a bare key into a RecordId of the expected table
pub fn parse_record_id(id: &str, table: &str, not_found: ErrorCode) -> AppResult<RecordId> {
    if let Ok(rid) = id.parse::<RecordId>() {
        if rid.table() == table {
            return Ok(rid);
        }
        return Err(AppError::new(not_found));
    }
    if !id.is_empty() && !id.contains(':') {
        return Ok(RecordId::from_table_key(table, id));
    }
    Err(AppError::new(not_found))
}

/// Persisted records always carry an id; absence is a server bug
pub fn missing_id() -> AppError {
    AppError::internal("Record is missing its id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_forms() {
        let rid = parse_medicine_id("medicine:abc123").unwrap();
        assert_eq!(rid.table(), "medicine");

        let rid = parse_medicine_id("abc123").unwrap();
        assert_eq!(rid.to_string(), "medicine:abc123");
    }

    #[test]
    fn test_wrong_table_is_not_found() {
        // Wrong table is not found, not reinterpreted
        assert!(parse_medicine_id("substance:abc").is_err());
        assert!(parse_substance_id("medicine:abc").is_err());
        assert!(parse_account_id("").is_err());
    }
}
