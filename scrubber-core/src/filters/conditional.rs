//! The `filter_if` conditional gate.
//!
//! Unlike every other filter, the engine hands this one the whole input document
//! instead of the attribute's value. It answers with a boolean that decides whether
//! the attribute's transformed value is kept.
//!
//! License: MIT OR APACHE 2.0

use serde_json::Value;

use super::{Filter, FILTER_IF};
use crate::errors::SanitizerError;
use crate::path;

/// Options `[attribute, expected]`: true when `attribute` exists in the document
/// and holds exactly the string `expected`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterIf;

impl Filter for FilterIf {
    fn apply(&self, document: Value, options: &[String]) -> Result<Value, SanitizerError> {
        self.apply_ref(&document, options)
    }

    fn apply_ref(&self, document: &Value, options: &[String]) -> Result<Value, SanitizerError> {
        let [attribute, expected, ..] = options else {
            return Err(SanitizerError::invalid_options(
                FILTER_IF,
                "expected an attribute name and the value it must hold",
            ));
        };
        let matched = matches!(
            path::get(document, attribute),
            Some(Value::String(actual)) if actual == expected
        );
        Ok(Value::Bool(matched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gate(document: Value, attribute: &str, expected: &str) -> Value {
        FilterIf
            .apply(document, &[attribute.to_string(), expected.to_string()])
            .unwrap()
    }

    #[test]
    fn test_matching_value_opens_gate() {
        assert_eq!(gate(json!({"role": "admin"}), "role", "admin"), json!(true));
    }

    #[test]
    fn test_other_value_or_missing_key_closes_gate() {
        assert_eq!(gate(json!({"role": "user"}), "role", "admin"), json!(false));
        assert_eq!(gate(json!({}), "role", "admin"), json!(false));
    }

    #[test]
    fn test_comparison_is_strict_on_type() {
        assert_eq!(gate(json!({"active": true}), "active", "true"), json!(false));
        assert_eq!(gate(json!({"age": 1}), "age", "1"), json!(false));
    }

    #[test]
    fn test_nested_attribute() {
        assert_eq!(gate(json!({"user": {"role": "admin"}}), "user.role", "admin"), json!(true));
    }

    #[test]
    fn test_borrowed_and_owned_entry_points_agree() {
        let document = json!({"user": {"role": "admin"}});
        let options = ["user.role".to_string(), "admin".to_string()];
        assert_eq!(FilterIf.apply_ref(&document, &options).unwrap(), json!(true));
        assert_eq!(FilterIf.apply(document, &options).unwrap(), json!(true));
    }

    #[test]
    fn test_missing_options() {
        let err = FilterIf.apply(json!({}), &["role".to_string()]).unwrap_err();
        assert!(matches!(err, SanitizerError::InvalidFilterOptions { .. }));
    }
}
