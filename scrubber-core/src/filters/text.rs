//! Plain string filters: whitespace, case and digit extraction.
//!
//! License: MIT OR APACHE 2.0

use serde_json::Value;

use super::{map_str, Filter};
use crate::errors::SanitizerError;

/// Strips leading and trailing whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct Trim;

impl Filter for Trim {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(map_str(value, |s| s.trim().to_string()))
    }
}

/// Unicode-aware lowercasing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lowercase;

impl Filter for Lowercase {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(map_str(value, str::to_lowercase))
    }
}

/// Unicode-aware uppercasing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Uppercase;

impl Filter for Uppercase {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(map_str(value, str::to_uppercase))
    }
}

/// Title-cases a string: everything is lowercased, then the first letter of each
/// whitespace-separated word is uppercased.
#[derive(Debug, Default, Clone, Copy)]
pub struct Capitalize;

impl Filter for Capitalize {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(map_str(value, capitalize_words))
    }
}

fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.to_lowercase().chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Keeps only the ASCII digits `0-9`.
///
/// Numbers are rendered to their decimal text first, so `-12.5` becomes `"125"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Digit;

impl Filter for Digit {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(match value {
            Value::String(s) => Value::String(digits_only(&s)),
            Value::Number(n) => Value::String(digits_only(&n.to_string())),
            other => other,
        })
    }
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}
