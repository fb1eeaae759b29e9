//! Validation of resolved option values

use std::ops::RangeInclusive;
use thiserror::Error;

/// A resolved option value that cannot be sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{field}' requires an integer value, received '{raw}'")]
    InvalidInteger { field: &'static str, raw: String },

    #[error("'{field}' must be between {min} and {max}, received {value}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error(
        "'{field}' requires exactly {expected} comma separated values, received {found} in '{raw}'"
    )]
    WrongArity {
        field: &'static str,
        expected: usize,
        found: usize,
        raw: String,
    },

    #[error("'{field}' expects a single user, received '{raw}'")]
    UnexpectedList { field: &'static str, raw: String },

    #[error("'{field}' requires a value, received '{raw}'")]
    Empty { field: &'static str, raw: String },
}

impl ValidationError {
    /// Name of the offending option
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInteger { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::WrongArity { field, .. }
            | Self::UnexpectedList { field, .. }
            | Self::Empty { field, .. } => field,
        }
    }
}

/// A validation failure attributed to the action that was being dispatched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{action}: {source}")]
pub struct ActionError {
    /// Display name of the action
    pub action: &'static str,
    #[source]
    pub source: ValidationError,
}

/// Parse a base-10 32-bit integer; fractions, blanks and overflow are rejected
pub(crate) fn parse_int(field: &'static str, raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidInteger {
            field,
            raw: raw.to_string(),
        })
}

pub(crate) fn check_range(
    field: &'static str,
    value: i32,
    range: RangeInclusive<i32>,
) -> Result<i32, ValidationError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Split a name list for fan-out.
///
/// Without a comma the value is used as-is. With commas every entry is
/// trimmed and blank entries are skipped; a list with no usable entry is an
/// error.
pub(crate) fn split_name_list(
    field: &'static str,
    raw: &str,
) -> Result<Vec<String>, ValidationError> {
    if !raw.contains(',') {
        return Ok(vec![raw.to_string()]);
    }

    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ValidationError::Empty {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(names)
}

/// Split into exactly `expected` trimmed values
pub(crate) fn split_exact(
    field: &'static str,
    raw: &str,
    expected: usize,
) -> Result<Vec<String>, ValidationError> {
    let values: Vec<String> = raw.split(',').map(|v| v.trim().to_string()).collect();
    if values.len() != expected {
        return Err(ValidationError::WrongArity {
            field,
            expected,
            found: values.len(),
            raw: raw.to_string(),
        });
    }
    Ok(values)
}

/// A single user name; lists are rejected
pub(crate) fn single_name(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    if raw.contains(',') {
        return Err(ValidationError::UnexpectedList {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(raw.to_string())
}

/// Trimmed, non-empty value
pub(crate) fn non_empty(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value.to_string())
}
