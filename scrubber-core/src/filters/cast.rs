//! The `cast` filter: converts a value to the type named by its first option.
//!
//! Supported targets are `int`/`integer`, `float`/`real`/`double`,
//! `string`, `bool`/`boolean`, and `array`/`object`. Conversions are lenient in the
//! way form input usually needs: `"12abc"` casts to `12`, `""` casts to `0`.
//! Structure casts never fail: a string holding a JSON sequence or mapping is
//! decoded, any other scalar is wrapped as the single element `[v]` / `{"0": v}`.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::{is_truthy, Filter, CAST};
use crate::errors::SanitizerError;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("numeric pattern is valid")
});

static INTEGER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("integer pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Integer,
    Float,
    Text,
    Boolean,
    Array,
    Object,
}

impl Target {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(Target::Integer),
            "float" | "real" | "double" => Some(Target::Float),
            "string" => Some(Target::Text),
            "bool" | "boolean" => Some(Target::Boolean),
            "array" => Some(Target::Array),
            "object" => Some(Target::Object),
            _ => None,
        }
    }
}

/// Converts values between JSON types.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cast;

impl Filter for Cast {
    fn apply(&self, value: Value, options: &[String]) -> Result<Value, SanitizerError> {
        let name = options
            .first()
            .ok_or_else(|| SanitizerError::invalid_options(CAST, "missing target type"))?;
        let target = Target::parse(name).ok_or_else(|| {
            SanitizerError::invalid_options(CAST, format!("unsupported target type '{name}'"))
        })?;

        match target {
            Target::Integer => Ok(Value::from(to_integer(&value))),
            Target::Float => to_float(&value).map(Value::Number),
            Target::Text => Ok(Value::String(to_text(&value))),
            Target::Boolean => Ok(Value::Bool(is_truthy(&value))),
            Target::Array => Ok(Value::Array(to_sequence(value))),
            Target::Object => Ok(Value::Object(to_mapping(value))),
        }
    }
}

fn to_integer(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .unwrap_or_else(|| n.as_f64().map_or(0, |f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Some(m) = INTEGER_PREFIX.find(s) {
                // Exponent or fraction forms ("1e3", "2.9") go through the float path.
                if s[m.end()..].starts_with(['.', 'e', 'E']) {
                    return parse_float_prefix(s).map_or(0, |f| f.trunc() as i64);
                }
                m.as_str().parse::<i64>().unwrap_or(if m.as_str().starts_with('-') {
                    i64::MIN
                } else {
                    i64::MAX
                })
            } else {
                parse_float_prefix(s).map_or(0, |f| f.trunc() as i64)
            }
        }
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    }
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    NUMERIC_PREFIX
        .find(s.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn to_float(value: &Value) -> Result<Number, SanitizerError> {
    let f = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s).unwrap_or(0.0),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(map) => f64::from(u8::from(!map.is_empty())),
    };
    Number::from_f64(f)
        .ok_or_else(|| SanitizerError::failed(CAST, "value is not a finite number"))
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        structured => structured.to_string(),
    }
}

/// Decodes a string holding a JSON sequence or mapping; every other value is
/// returned untouched.
fn decode_structure(value: Value) -> Value {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(decoded @ (Value::Array(_) | Value::Object(_))) => decoded,
            _ => Value::String(s),
        },
        other => other,
    }
}

fn to_sequence(value: Value) -> Vec<Value> {
    match decode_structure(value) {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        scalar => vec![scalar],
    }
}

fn to_mapping(value: Value) -> Map<String, Value> {
    match decode_structure(value) {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, v)| (index.to_string(), v))
            .collect(),
        scalar => Map::from_iter([("0".to_string(), scalar)]),
    }
}
