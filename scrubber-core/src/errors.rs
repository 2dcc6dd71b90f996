//! errors.rs - Custom error types for the scrubber-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `scrubber-core` library.
///
/// Every variant describes a misconfiguration of rules or filters. None of them
/// is recoverable inside the engine: a failing `sanitize()` call returns the
/// error and no partially sanitized data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SanitizerError {
    #[error("Unsupported rule type for attribute '{attribute}': expected a rule string or an inline filter, found {found}")]
    InvalidRuleType { attribute: String, found: String },

    #[error("No filter found by the name of {0}")]
    UnknownFilter(String),

    #[error("Filter '{filter}' received invalid options: {reason}")]
    InvalidFilterOptions { filter: String, reason: String },

    #[error("Filter '{filter}' failed: {reason}")]
    FilterFailed { filter: String, reason: String },

    #[error("Invalid sanitizer configuration: {0}")]
    Config(String),
}

impl SanitizerError {
    pub(crate) fn invalid_options(filter: &str, reason: impl Into<String>) -> Self {
        SanitizerError::InvalidFilterOptions {
            filter: filter.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn failed(filter: &str, reason: impl Into<String>) -> Self {
        SanitizerError::FilterFailed {
            filter: filter.to_string(),
            reason: reason.into(),
        }
    }
}

/// Short, value-free description of a JSON value's kind for error messages.
pub(crate) fn describe_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
