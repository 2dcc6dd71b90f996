//! The rule-driven sanitization engine.
//!
//! A [`Sanitizer`] is built from a document, a [`RuleSpec`] and a filter registry.
//! Rules are expanded against the document and parsed once, at construction.
//! [`Sanitizer::sanitize`] then applies every attribute's rules in order and
//! returns a sanitized copy of the document; the engine itself is never mutated,
//! so the call can be repeated and always yields the same result.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, trace};
use serde_json::Value;

use crate::errors::SanitizerError;
use crate::filters::{self, is_truthy, FilterHandle};
use crate::path;
use crate::registry::FilterRegistry;
use crate::rules::{self, AttributeRules, ParsedRule, RuleExpander, RuleSpec, WildcardExpander};

/// Applies per-attribute filter chains to a document.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    data: Value,
    rules: Vec<AttributeRules>,
    filters: FilterRegistry,
}

impl Sanitizer {
    /// A sanitizer using the built-in filters only.
    pub fn new(data: Value, rules: &RuleSpec) -> Self {
        Self::with_registry(data, rules, FilterRegistry::with_defaults())
    }

    /// A sanitizer whose built-in filters are overridden or extended by
    /// `custom_filters`. Same-name entries replace built-ins.
    pub fn with_filters<I, S>(data: Value, rules: &RuleSpec, custom_filters: I) -> Self
    where
        I: IntoIterator<Item = (S, FilterHandle)>,
        S: Into<String>,
    {
        let mut registry = FilterRegistry::with_defaults();
        registry.extend(custom_filters);
        Self::with_registry(data, rules, registry)
    }

    /// A sanitizer using exactly the filters in `registry`.
    pub fn with_registry(data: Value, rules: &RuleSpec, registry: FilterRegistry) -> Self {
        Self::from_parts(data, rules, registry, &WildcardExpander)
    }

    /// A sanitizer using a custom expansion strategy for attribute paths.
    pub fn from_parts(
        data: Value,
        rules: &RuleSpec,
        registry: FilterRegistry,
        expander: &dyn RuleExpander,
    ) -> Self {
        let expanded = expander.expand(rules, &data);
        let parsed = rules::parse(&expanded);
        debug!(
            "Sanitizer ready: {} attribute(s) with rules, {} filter(s) registered.",
            parsed.len(),
            registry.len()
        );
        Self {
            data,
            rules: parsed,
            filters: registry,
        }
    }

    /// The document this sanitizer was built with.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The parsed, concrete rules in application order.
    pub fn parsed_rules(&self) -> &[AttributeRules] {
        &self.rules
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Returns a sanitized copy of the document.
    ///
    /// Attributes whose path is missing from the document are skipped. For every
    /// other attribute the rules run in order over the current value. A
    /// `filter_if` rule is evaluated against the whole original document and only
    /// decides whether the final value is kept; when the last gate evaluated is
    /// false the attribute keeps its original value.
    ///
    /// Any error (unknown filter, bad options, failing filter) aborts the whole
    /// call and no data is returned.
    pub fn sanitize(&self) -> Result<Value, SanitizerError> {
        let mut sanitized = self.data.clone();

        for AttributeRules { attribute, rules } in &self.rules {
            let Some(original) = path::get(&self.data, attribute) else {
                trace!("Attribute '{}' is absent, skipping.", attribute);
                continue;
            };

            let mut value = original.clone();
            let mut commit = true;
            for rule in rules {
                if rule.is_gate() {
                    commit = self.evaluate_gate(rule)?;
                } else {
                    value = self.apply_rule(rule, value)?;
                }
            }

            let result = if commit { value } else { original.clone() };
            trace!("Attribute '{}' {}.", attribute, if commit { "sanitized" } else { "left unchanged by gate" });
            path::set(&mut sanitized, attribute, result);
        }

        Ok(sanitized)
    }

    fn apply_rule(&self, rule: &ParsedRule, value: Value) -> Result<Value, SanitizerError> {
        match rule {
            ParsedRule::Inline(filter) => filter.apply(value, &[]),
            ParsedRule::Named { name, options } => self.filters.resolve(name)?.apply(value, options),
        }
    }

    fn evaluate_gate(&self, rule: &ParsedRule) -> Result<bool, SanitizerError> {
        let options: &[String] = match rule {
            ParsedRule::Named { options, .. } => options,
            ParsedRule::Inline(_) => &[],
        };
        let verdict = self
            .filters
            .resolve(filters::FILTER_IF)?
            .apply_ref(&self.data, options)?;
        Ok(is_truthy(&verdict))
    }
}
