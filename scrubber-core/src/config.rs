//! Configuration management for `scrubber-core`.
//!
//! Rules can be kept in YAML documents instead of being built in code:
//!
//! ```yaml
//! rules:
//!   name: "trim|capitalize"
//!   email: [trim, lowercase]
//!   "users.*.phone": digit
//! filters:
//!   slug: [trim, lowercase, strip_tags]
//! ```
//!
//! `rules` maps attribute paths to rule strings. `filters` defines composite
//! filters: a name that runs a list of rule strings in sequence and can be used in
//! `rules` like any built-in. This module handles loading, merging and validating
//! these documents.
//!
//! License: MIT OR Apache-2.0

use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SanitizerError;
use crate::filters::Filter;
use crate::registry::FilterRegistry;
use crate::rules::{self, ParsedRule, RuleSpec, RULE_SEPARATOR};

/// Top-level structure of a rules document.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct RulesConfig {
    /// Attribute path to a rule string or a list of rule strings.
    #[serde(default)]
    pub rules: Map<String, Value>,
    /// Composite filter name to the rule strings it runs.
    #[serde(default)]
    pub filters: Map<String, Value>,
}

impl RulesConfig {
    /// Loads a rules document from a YAML (or JSON) file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sanitizer rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))?;
        info!(
            "Loaded {} attribute rule(s) and {} composite filter(s) from {}.",
            config.rules.len(),
            config.filters.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates a rules document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: RulesConfig = serde_yml::from_str(text).context("Invalid rules document")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the built-in rule set embedded in the library.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default sanitizer rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RulesConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;
        debug!("Loaded {} default attribute rule(s).", config.rules.len());
        Ok(config)
    }

    /// Checks attribute names, composite filter names and descriptor types.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for (attribute, entry) in &self.rules {
            if attribute.trim().is_empty() {
                errors.push("A rule has an empty attribute path.".to_string());
            }
            if let Err(e) = descriptor_strings(attribute, entry) {
                errors.push(e.to_string());
            }
        }

        for (name, entry) in &self.filters {
            if name.trim().is_empty() {
                errors.push("A composite filter has an empty name.".to_string());
                continue;
            }
            match descriptor_strings(name, entry) {
                Ok(steps) => {
                    if steps.is_empty() {
                        warn!("Composite filter '{}' has no steps and will pass values through.", name);
                    }
                    if references(&steps, name) {
                        errors.push(format!("Composite filter '{}' refers to itself.", name));
                    }
                }
                Err(e) => errors.push(e.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Rules validation failed:\n{}", errors.join("\n")))
        }
    }

    /// The attribute rules as a [`RuleSpec`], in document order.
    pub fn rule_spec(&self) -> Result<RuleSpec, SanitizerError> {
        RuleSpec::from_value(&Value::Object(self.rules.clone()))
    }

    /// Built-in filters plus this document's composite filters.
    pub fn registry(&self) -> Result<FilterRegistry, SanitizerError> {
        let mut registry = FilterRegistry::with_defaults();
        self.register_into(&mut registry)?;
        Ok(registry)
    }

    /// Registers this document's composite filters into `registry`.
    ///
    /// Each composite resolves its steps against the registry as it was before any
    /// composite was added, so composites can use built-ins and custom filters but
    /// not each other.
    pub fn register_into(&self, registry: &mut FilterRegistry) -> Result<(), SanitizerError> {
        let base = registry.clone();
        for (name, entry) in &self.filters {
            let steps = descriptor_strings(name, entry)?
                .iter()
                .flat_map(|packed| packed.split(RULE_SEPARATOR))
                .filter_map(rules::parse_rule_string)
                .collect::<Vec<_>>();
            let chain = ChainFilter::new(steps, base.clone())?;
            debug!("Registering composite filter '{}' with {} step(s).", name, chain.len());
            registry.register(name.clone(), chain);
        }
        Ok(())
    }
}

/// Merges user rules over defaults.
///
/// A user entry for an attribute (or composite filter) replaces the default entry
/// of the same name in place; new names are appended after the defaults.
pub fn merge_rules(default_config: RulesConfig, user_config: Option<RulesConfig>) -> RulesConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());

    let mut merged = default_config;
    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        for (attribute, entry) in user_cfg.rules {
            merged.rules.insert(attribute, entry);
        }
        for (name, entry) in user_cfg.filters {
            merged.filters.insert(name, entry);
        }
    }

    debug!("Final total rules after merge: {}", merged.rules.len());
    merged
}

fn descriptor_strings(owner: &str, entry: &Value) -> Result<Vec<String>, SanitizerError> {
    let invalid = |found: &Value| SanitizerError::InvalidRuleType {
        attribute: owner.to_string(),
        found: crate::errors::describe_kind(found).to_string(),
    };
    match entry {
        Value::String(text) => Ok(vec![text.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
            .collect(),
        other => Err(invalid(other)),
    }
}

fn references(steps: &[String], name: &str) -> bool {
    steps
        .iter()
        .flat_map(|packed| packed.split(RULE_SEPARATOR))
        .filter_map(rules::parse_rule_string)
        .any(|rule| rule.name() == Some(name))
}

/// A filter that runs a fixed list of named rules in sequence.
///
/// Steps are checked against the registry when the chain is built, so an unknown
/// step name fails at configuration time rather than mid-sanitization.
#[derive(Debug, Clone)]
pub struct ChainFilter {
    steps: Vec<ParsedRule>,
    registry: FilterRegistry,
}

impl ChainFilter {
    pub fn new(steps: Vec<ParsedRule>, registry: FilterRegistry) -> Result<Self, SanitizerError> {
        for step in &steps {
            if let Some(name) = step.name() {
                registry.resolve(name)?;
            }
        }
        Ok(Self { steps, registry })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Filter for ChainFilter {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        self.steps.iter().try_fold(value, |current, step| match step {
            ParsedRule::Named { name, options } => self.registry.resolve(name)?.apply(current, options),
            ParsedRule::Inline(filter) => filter.apply(current, &[]),
        })
    }
}

/// Names used by `config` that are not registered in `registry`.
pub fn unknown_filter_names(config: &RulesConfig, registry: &FilterRegistry) -> Vec<String> {
    let mut seen = HashSet::new();
    config
        .rules
        .iter()
        .filter_map(|(attribute, entry)| descriptor_strings(attribute, entry).ok())
        .flatten()
        .flat_map(|packed| {
            packed
                .split(RULE_SEPARATOR)
                .filter_map(rules::parse_rule_string)
                .filter_map(|rule| rule.name().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .filter(|name| !registry.contains(name) && seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_rules_parse() {
        let config = RulesConfig::load_default_rules().unwrap();
        assert!(!config.rules.is_empty());
        config.validate().unwrap();
        let registry = config.registry().unwrap();
        assert!(unknown_filter_names(&config, &registry).is_empty());
    }

    #[test]
    fn test_chain_filter_runs_steps_in_order() {
        let registry = FilterRegistry::with_defaults();
        let steps = vec![
            rules::parse_rule_string("strip_tags").unwrap(),
            rules::parse_rule_string("trim").unwrap(),
            rules::parse_rule_string("uppercase").unwrap(),
        ];
        let chain = ChainFilter::new(steps, registry).unwrap();
        assert_eq!(chain.apply(json!(" <i>hi</i> "), &[]).unwrap(), json!("HI"));
    }

    #[test]
    fn test_chain_filter_rejects_unknown_step() {
        let steps = vec![rules::parse_rule_string("nope").unwrap()];
        let err = ChainFilter::new(steps, FilterRegistry::with_defaults()).unwrap_err();
        assert_eq!(err, SanitizerError::UnknownFilter("nope".to_string()));
    }

    #[test]
    fn test_self_referencing_composite_is_invalid() {
        let result = RulesConfig::from_yaml_str("filters:\n  loop: [trim, loop]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_filter_names() {
        let config = RulesConfig::from_yaml_str("rules:\n  a: trim|hash\n  b: [hash, salt]\n").unwrap();
        let names = unknown_filter_names(&config, &FilterRegistry::with_defaults());
        assert_eq!(names, vec!["hash".to_string(), "salt".to_string()]);
    }
}
