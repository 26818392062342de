//! Checks that turn raw submitted fields into typed values.
//!
//! Both checks are pure. Messages are returned to the requester verbatim, so
//! their wording is part of the wire contract.

use std::num::IntErrorKind;

use serde_json::Value;
use thiserror::Error;

use crate::models::{Fields, TaskId};

/// A malformed or missing client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("id must be string")]
    IdNotString,
    #[error("id must be numeric string")]
    IdNotNumeric,
    #[error("name must be string")]
    NameNotString,
    #[error("name must be at least 1 characters")]
    NameTooShort,
}

/// Extract the `id` field as a base-10 integer.
///
/// No range check is made; the store decides whether the id exists. Values
/// beyond the id type saturate to its bounds and are left for the store to
/// report as missing.
pub fn validate_id(fields: &Fields) -> Result<TaskId, ValidationError> {
    let Some(Value::String(raw)) = fields.get("id") else {
        return Err(ValidationError::IdNotString);
    };
    match raw.parse::<TaskId>() {
        Ok(id) => Ok(id),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(TaskId::MAX),
            IntErrorKind::NegOverflow => Ok(TaskId::MIN),
            _ => Err(ValidationError::IdNotNumeric),
        },
    }
}

/// Extract the `name` field. The value is returned untrimmed.
///
/// A missing field is read as an empty submission: a text input always posts
/// its (possibly empty) value, so absence and emptiness are the same defect.
pub fn validate_name(fields: &Fields) -> Result<String, ValidationError> {
    let name = match fields.get("name") {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(ValidationError::NameNotString),
    };
    if name.chars().count() < 1 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(name.to_string())
}
