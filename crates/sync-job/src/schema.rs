//! Strict validation of the upstream response body.
//!
//! The body must be a JSON array whose every element is an object with
//! string `state` and `city` fields. One bad element rejects the batch.
//! Unknown fields are ignored.

use metadata::CityRecord;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why an upstream body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("expected an array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("record {index}: expected an object, found {found}")]
    NotAnObject { index: usize, found: &'static str },

    #[error("record {index}: missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index}: field `{field}` must be a string, found {found}")]
    WrongType {
        index: usize,
        field: &'static str,
        found: &'static str,
    },
}

/// Parses and validates a raw response body.
pub fn parse_records(body: &[u8]) -> Result<Vec<CityRecord>, SchemaError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
    validate_records(value)
}

/// Validates an already-parsed JSON value.
pub fn validate_records(value: Value) -> Result<Vec<CityRecord>, SchemaError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(SchemaError::NotAnArray(kind(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(mut fields) => Ok(CityRecord {
                state: take_string(&mut fields, index, "state")?,
                city: take_string(&mut fields, index, "city")?,
            }),
            other => Err(SchemaError::NotAnObject {
                index,
                found: kind(&other),
            }),
        })
        .collect()
}

fn take_string(
    fields: &mut Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, SchemaError> {
    match fields.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(SchemaError::WrongType {
            index,
            field,
            found: kind(&other),
        }),
        None => Err(SchemaError::MissingField { index, field }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
