// scrubber-core/src/headless.rs
// File: scrubber-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot sanitization driven by a rules document.
//!
//! These helpers build a [`Sanitizer`] from a [`RulesConfig`] (attribute rules plus
//! composite filters), run it once, and attach context to any failure. They are
//! what the command-line front-end uses.

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::config::RulesConfig;
use crate::registry::FilterRegistry;
use crate::sanitizer::Sanitizer;

/// Builds a sanitizer for `data` from a rules document.
///
/// Custom filters registered in `registry` are available to both the attribute
/// rules and the document's composite filters.
pub fn sanitizer_from_config(
    data: Value,
    config: &RulesConfig,
    mut registry: FilterRegistry,
) -> Result<Sanitizer> {
    config
        .register_into(&mut registry)
        .context("Failed to register composite filters")?;
    let rules = config.rule_spec().context("Failed to read attribute rules")?;
    Ok(Sanitizer::with_registry(data, &rules, registry))
}

/// Sanitizes `data` in a single call using the built-in filters and `config`.
///
/// # Arguments
///
/// * `data` - The document to sanitize.
/// * `config` - The merged rules document (defaults + optional user overrides).
pub fn headless_sanitize_value(data: Value, config: &RulesConfig) -> Result<Value> {
    let sanitizer = sanitizer_from_config(data, config, FilterRegistry::with_defaults())?;
    debug!("Running headless sanitization over {} attribute(s).", sanitizer.parsed_rules().len());
    sanitizer.sanitize().context("Sanitization failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headless_sanitize_value() -> Result<()> {
        let config = RulesConfig::from_yaml_str(
            r#"
rules:
  name: "trim|capitalize"
  "users.*.email": [plain_text, lowercase]
filters:
  plain_text: [strip_tags, trim]
"#,
        )?;
        let data = json!({
            "name": "  aDA lovelace ",
            "users": [{"email": " <b>ADA@Example.com</b>"}, {"email": "x@Y.org "}]
        });

        let sanitized = headless_sanitize_value(data, &config)?;

        assert_eq!(
            sanitized,
            json!({
                "name": "Ada Lovelace",
                "users": [{"email": "ada@example.com"}, {"email": "x@y.org"}]
            })
        );
        Ok(())
    }

    #[test]
    fn test_headless_unknown_filter_fails() {
        let config = RulesConfig::from_yaml_str("rules:\n  name: shout\n").unwrap();
        let err = headless_sanitize_value(json!({"name": "x"}), &config).unwrap_err();
        assert!(format!("{err:#}").contains("No filter found by the name of shout"));
    }
}
