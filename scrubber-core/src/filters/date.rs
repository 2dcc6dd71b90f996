//! The `format_date` filter.
//!
//! Options are `[from, to]`, both `chrono` strftime patterns, e.g.
//! `format_date:%d/%m/%Y,%Y-%m-%d`. The input is read with `from` as a zoned
//! date-time, a naive date-time, or a plain date (first that parses), and written
//! back with `to`.
//!
//! License: MIT OR APACHE 2.0

use std::fmt::{Display, Write};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::{Filter, FORMAT_DATE};
use crate::errors::SanitizerError;

/// Re-formats date strings from one pattern to another.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatDate;

impl Filter for FormatDate {
    fn apply(&self, value: Value, options: &[String]) -> Result<Value, SanitizerError> {
        let [from, to, ..] = options else {
            return Err(SanitizerError::invalid_options(
                FORMAT_DATE,
                "expected the current format and the target format",
            ));
        };

        if !matches!(&value, Value::String(s) if !s.trim().is_empty()) {
            return Ok(value);
        }
        let input = value.as_str().unwrap_or_default().trim();

        let formatted = if let Ok(dt) = DateTime::parse_from_str(input, from) {
            render(dt.format(to))
        } else if let Ok(dt) = NaiveDateTime::parse_from_str(input, from) {
            render(dt.format(to))
        } else if let Ok(date) = NaiveDate::parse_from_str(input, from) {
            render(date.format(to))
        } else {
            return Err(SanitizerError::failed(
                FORMAT_DATE,
                format!("value does not match the format '{from}'"),
            ));
        };

        formatted.map(Value::String).map_err(|_| {
            SanitizerError::failed(
                FORMAT_DATE,
                format!("target format '{to}' cannot be rendered from the parsed value"),
            )
        })
    }
}

// `to_string()` on chrono's delayed formatter panics on unsupported items; writing
// through `fmt::Write` surfaces the error instead.
fn render(formatted: impl Display) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write!(out, "{formatted}")?;
    Ok(out)
}
