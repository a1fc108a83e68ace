pub mod rules;
pub mod sanitize;
pub mod schemas;

pub use rules::{parse_iso_date, validate, validate_value, FieldSpec, Pattern, Presence, Record, Rule, Schema};
pub use sanitize::{sanitize_str, sanitize_text};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AppError;

/// Sanitizes `payload`, validates it against `schema` and returns the
/// normalized record.
pub fn clean_payload(schema: &Schema, payload: Value) -> Result<Record, AppError> {
    let sanitized = sanitize_text(payload);
    validate_value(schema, &sanitized).map_err(AppError::ValidationError)
}

/// Deserializes a normalized record into its typed form.
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| AppError::InternalError(format!("Normalized record did not match its type: {}", e)))
}

/// Ids are positive integers.
pub fn validate_id(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation("id", "Invalid ID parameter")),
    }
}
