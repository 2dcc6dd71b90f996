//! The filter contract and the built-in filters.
//!
//! A filter takes the current value of an attribute plus the positional options
//! written after the `:` in a rule string, and returns the transformed value.
//! Built-in filters are unit structs; any closure with the signature
//! `Fn(Value, &[String]) -> Result<Value, SanitizerError>` is a filter too.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use serde_json::Value;

use crate::errors::SanitizerError;

pub mod cast;
pub mod conditional;
pub mod date;
pub mod html;
pub mod text;

pub use cast::Cast;
pub use conditional::FilterIf;
pub use date::FormatDate;
pub use html::{EscapeHtml, StripTags};
pub use text::{Capitalize, Digit, Lowercase, Trim, Uppercase};

pub const CAPITALIZE: &str = "capitalize";
pub const CAST: &str = "cast";
pub const DIGIT: &str = "digit";
pub const ESCAPE: &str = "escape";
pub const FILTER_IF: &str = "filter_if";
pub const FORMAT_DATE: &str = "format_date";
pub const LOWERCASE: &str = "lowercase";
pub const STRIP_TAGS: &str = "strip_tags";
pub const TRIM: &str = "trim";
pub const UPPERCASE: &str = "uppercase";

/// A named, pluggable transformation applied to a single value.
pub trait Filter: Send + Sync {
    /// Transforms `value` according to `options`.
    ///
    /// Filters that do not understand the kind of value they receive should hand it
    /// back unchanged rather than fail.
    fn apply(&self, value: Value, options: &[String]) -> Result<Value, SanitizerError>;

    /// Same as [`Filter::apply`] over a borrowed value.
    ///
    /// The engine calls this for the conditional gate, which reads the whole
    /// document. Filters that only inspect their input should override it so no
    /// copy is made; the default clones.
    fn apply_ref(&self, value: &Value, options: &[String]) -> Result<Value, SanitizerError> {
        self.apply(value.clone(), options)
    }
}

impl<F> Filter for F
where
    F: Fn(Value, &[String]) -> Result<Value, SanitizerError> + Send + Sync,
{
    fn apply(&self, value: Value, options: &[String]) -> Result<Value, SanitizerError> {
        self(value, options)
    }
}

/// Shared handle to a registered filter. Invoked the same way whether it wraps a
/// type or a closure.
pub type FilterHandle = Arc<dyn Filter>;

/// Wraps a closure into a [`FilterHandle`].
///
/// Taking the closure through an `Fn` bound lets the compiler infer its argument
/// and error types at the call site.
pub fn from_fn<F>(f: F) -> FilterHandle
where
    F: Fn(Value, &[String]) -> Result<Value, SanitizerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Loose truthiness used by the conditional gate and by `cast:bool`.
///
/// `null`, `false`, `0`, `0.0`, `""`, `"0"` and empty sequences or mappings are
/// false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Maps a string-typed value through `f`; every other value passes through.
pub(crate) fn map_str(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_is_a_filter() {
        let repeat = from_fn(|value: Value, _: &[String]| {
            Ok(map_str(value, |s| s.repeat(2)))
        });
        assert_eq!(repeat.apply(json!("ab"), &[]).unwrap(), json!("abab"));
        assert_eq!(repeat.apply(json!(7), &[]).unwrap(), json!(7));
    }

    #[test]
    fn test_is_truthy() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("no"), json!("false"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }
}
