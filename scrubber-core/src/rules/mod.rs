//! Rule specifications and the rule-string parser.
//!
//! A [`RuleSpec`] maps attribute paths to rule descriptors. A descriptor is either a
//! rule string (`"trim"`, `"cast:int"`, `"filter_if:role,admin"`) or an inline
//! filter. Parsing turns each descriptor into a [`ParsedRule`]; the resulting
//! per-attribute lists are applied in order by the sanitizer.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use serde_json::Value;

use crate::errors::{describe_kind, SanitizerError};
use crate::filters::{self, FilterHandle};

pub mod expand;

pub use expand::{ExpandedRules, RuleExpander, WildcardExpander};

/// Separates a filter name from its options.
pub const OPTIONS_DELIMITER: char = ':';
/// Separates options from each other.
pub const OPTION_SEPARATOR: char = ',';
/// Separates several rule strings packed into one (`"trim|lowercase"`).
pub const RULE_SEPARATOR: char = '|';

/// A rule as written by the caller, before parsing.
#[derive(Clone)]
pub enum RuleDescriptor {
    /// `"name"` or `"name:opt1,opt2"`, possibly several joined with `|`.
    Text(String),
    /// A filter invoked directly, bypassing the registry.
    Inline(FilterHandle),
}

impl RuleDescriptor {
    /// Wraps a closure as an inline descriptor. It receives no options.
    pub fn inline<F>(f: F) -> Self
    where
        F: Fn(Value, &[String]) -> Result<Value, SanitizerError> + Send + Sync + 'static,
    {
        RuleDescriptor::Inline(filters::from_fn(f))
    }
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDescriptor::Text(text) => f.debug_tuple("Text").field(text).finish(),
            RuleDescriptor::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl From<&str> for RuleDescriptor {
    fn from(text: &str) -> Self {
        RuleDescriptor::Text(text.to_string())
    }
}

impl From<String> for RuleDescriptor {
    fn from(text: String) -> Self {
        RuleDescriptor::Text(text)
    }
}

impl From<FilterHandle> for RuleDescriptor {
    fn from(handle: FilterHandle) -> Self {
        RuleDescriptor::Inline(handle)
    }
}

/// Ordered mapping from attribute path to rule descriptors.
///
/// Attribute paths are dot-delimited and may contain `*` wildcard segments.
/// Insertion order is the order attributes are sanitized in.
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    entries: Vec<(String, Vec<RuleDescriptor>)>,
    positions: HashMap<String, usize>,
}

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `descriptor` to the rules of `attribute`.
    pub fn rule(mut self, attribute: impl Into<String>, descriptor: impl Into<RuleDescriptor>) -> Self {
        self.push(attribute.into(), descriptor.into());
        self
    }

    /// Appends every descriptor in `descriptors` to the rules of `attribute`.
    pub fn rules<I, D>(mut self, attribute: impl Into<String>, descriptors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<RuleDescriptor>,
    {
        let attribute = attribute.into();
        for descriptor in descriptors {
            self.push(attribute.clone(), descriptor.into());
        }
        self
    }

    /// Appends an inline closure to the rules of `attribute`.
    pub fn inline<F>(self, attribute: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, &[String]) -> Result<Value, SanitizerError> + Send + Sync + 'static,
    {
        self.rule(attribute, RuleDescriptor::inline(f))
    }

    /// Sets the rules of `attribute`, replacing any it already had.
    pub fn insert(&mut self, attribute: impl Into<String>, descriptors: Vec<RuleDescriptor>) {
        let attribute = attribute.into();
        *self.slot(attribute) = descriptors;
    }

    fn push(&mut self, attribute: String, descriptor: RuleDescriptor) {
        self.slot(attribute).push(descriptor);
    }

    fn slot(&mut self, attribute: String) -> &mut Vec<RuleDescriptor> {
        let at = match self.positions.get(&attribute) {
            Some(&at) => at,
            None => {
                self.positions.insert(attribute.clone(), self.entries.len());
                self.entries.push((attribute, Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[at].1
    }

    pub fn get(&self, attribute: &str) -> Option<&[RuleDescriptor]> {
        self.positions
            .get(attribute)
            .map(|&at| self.entries[at].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleDescriptor])> {
        self.entries
            .iter()
            .map(|(attribute, descriptors)| (attribute.as_str(), descriptors.as_slice()))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(attribute, _)| attribute.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a spec from loosely typed input, e.g. a parsed YAML or JSON document.
    ///
    /// `rules` must be a mapping; each value is a rule string or a sequence of rule
    /// strings. Anything else fails with [`SanitizerError::InvalidRuleType`].
    pub fn from_value(rules: &Value) -> Result<Self, SanitizerError> {
        let map = match rules {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(SanitizerError::Config(format!(
                    "rules must be a mapping of attribute to rules, found {}",
                    describe_kind(other)
                )))
            }
        };

        let mut spec = Self::new();
        for (attribute, entry) in map {
            let descriptors = match entry {
                Value::String(text) => vec![RuleDescriptor::Text(text.clone())],
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => Ok(RuleDescriptor::Text(text.clone())),
                        other => Err(invalid_rule_type(attribute, other)),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                other => return Err(invalid_rule_type(attribute, other)),
            };
            spec.insert(attribute.clone(), descriptors);
        }
        Ok(spec)
    }
}

impl TryFrom<&Value> for RuleSpec {
    type Error = SanitizerError;

    fn try_from(rules: &Value) -> Result<Self, Self::Error> {
        RuleSpec::from_value(rules)
    }
}

impl<A, D> FromIterator<(A, D)> for RuleSpec
where
    A: Into<String>,
    D: Into<RuleDescriptor>,
{
    fn from_iter<T: IntoIterator<Item = (A, D)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(RuleSpec::new(), |spec, (attribute, descriptor)| spec.rule(attribute, descriptor))
    }
}

fn invalid_rule_type(attribute: &str, found: &Value) -> SanitizerError {
    SanitizerError::InvalidRuleType {
        attribute: attribute.to_string(),
        found: describe_kind(found).to_string(),
    }
}

/// A descriptor after parsing.
#[derive(Clone)]
pub enum ParsedRule {
    /// A registry filter with its positional options.
    Named { name: String, options: Vec<String> },
    /// An inline filter, applied as-is.
    Inline(FilterHandle),
}

impl ParsedRule {
    /// The registry name, `None` for inline rules.
    pub fn name(&self) -> Option<&str> {
        match self {
            ParsedRule::Named { name, .. } => Some(name.as_str()),
            ParsedRule::Inline(_) => None,
        }
    }

    /// True for the conditional gate.
    pub fn is_gate(&self) -> bool {
        self.name() == Some(filters::FILTER_IF)
    }
}

impl fmt::Debug for ParsedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedRule::Named { name, options } => f
                .debug_struct("Named")
                .field("name", name)
                .field("options", options)
                .finish(),
            ParsedRule::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl PartialEq for ParsedRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ParsedRule::Named { name, options },
                ParsedRule::Named { name: other_name, options: other_options },
            ) => name == other_name && options == other_options,
            (ParsedRule::Inline(a), ParsedRule::Inline(b)) => std::sync::Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Parses `"name"` or `"name:opt1, opt2"`.
///
/// The string is split on the first `:` only; options are split on `,` and each is
/// trimmed. An empty name yields `None`: the rule is dropped, not rejected.
pub fn parse_rule_string(rule: &str) -> Option<ParsedRule> {
    let (name, options) = match rule.split_once(OPTIONS_DELIMITER) {
        Some((name, raw_options)) => (
            name,
            raw_options
                .split(OPTION_SEPARATOR)
                .map(|option| option.trim().to_string())
                .collect(),
        ),
        None => (rule, Vec::new()),
    };

    if name.is_empty() {
        warn!("Dropping a rule with an empty filter name.");
        return None;
    }

    Some(ParsedRule::Named {
        name: name.to_string(),
        options,
    })
}

/// Parses a single (already exploded) descriptor.
pub fn parse_descriptor(descriptor: &RuleDescriptor) -> Option<ParsedRule> {
    match descriptor {
        RuleDescriptor::Text(text) => parse_rule_string(text),
        RuleDescriptor::Inline(handle) => Some(ParsedRule::Inline(handle.clone())),
    }
}

/// The parsed rules of one concrete attribute, in application order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRules {
    pub attribute: String,
    pub rules: Vec<ParsedRule>,
}

/// Parses expanded rules. Attributes left without any rule are omitted.
pub fn parse(expanded: &ExpandedRules) -> Vec<AttributeRules> {
    let parsed: Vec<AttributeRules> = expanded
        .iter()
        .filter_map(|(attribute, descriptors)| {
            let rules: Vec<ParsedRule> = descriptors.iter().filter_map(parse_descriptor).collect();
            (!rules.is_empty()).then(|| AttributeRules {
                attribute: attribute.clone(),
                rules,
            })
        })
        .collect();

    debug!(
        "Parsed {} rule(s) across {} attribute(s).",
        parsed.iter().map(|a| a.rules.len()).sum::<usize>(),
        parsed.len()
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str, options: &[&str]) -> ParsedRule {
        ParsedRule::Named {
            name: name.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_name_only() {
        assert_eq!(parse_rule_string("trim"), Some(named("trim", &[])));
    }

    #[test]
    fn test_parse_trims_options() {
        assert_eq!(parse_rule_string("trim:a, b"), Some(named("trim", &["a", "b"])));
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        assert_eq!(
            parse_rule_string("format_date:%H:%M, %Y"),
            Some(named("format_date", &["%H:%M", "%Y"]))
        );
    }

    #[test]
    fn test_parse_keeps_empty_options() {
        assert_eq!(parse_rule_string("cast:"), Some(named("cast", &[""])));
    }

    #[test]
    fn test_empty_name_is_dropped() {
        assert_eq!(parse_rule_string(""), None);
        assert_eq!(parse_rule_string(":a,b"), None);
    }

    #[test]
    fn test_inline_descriptor_is_carried_through() {
        let descriptor = RuleDescriptor::inline(|v: Value, _: &[String]| Ok(v));
        let parsed = parse_descriptor(&descriptor).unwrap();
        assert!(matches!(parsed, ParsedRule::Inline(_)));
        assert_eq!(parsed.name(), None);
    }

    #[test]
    fn test_gate_detection() {
        assert!(named("filter_if", &["role", "admin"]).is_gate());
        assert!(!named("trim", &[]).is_gate());
    }

    #[test]
    fn test_builder_groups_by_attribute() {
        let spec = RuleSpec::new()
            .rule("name", "trim")
            .rule("email", "lowercase")
            .rule("name", "capitalize");
        let attributes: Vec<&str> = spec.attributes().collect();
        assert_eq!(attributes, vec!["name", "email"]);
        assert_eq!(spec.get("name").map(<[RuleDescriptor]>::len), Some(2));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut spec = RuleSpec::new().rule("a", "trim").rule("b", "digit");
        spec.insert("a", vec!["uppercase".into()]);
        spec.insert("c", vec![]);
        let attributes: Vec<&str> = spec.attributes().collect();
        assert_eq!(attributes, vec!["a", "b", "c"]);
        assert_eq!(spec.get("a").map(<[RuleDescriptor]>::len), Some(1));
        assert_eq!(spec.get("c").map(<[RuleDescriptor]>::len), Some(0));
        assert!(spec.get("missing").is_none());
    }

    #[test]
    fn test_from_value_accepts_strings_and_sequences() {
        let spec = RuleSpec::from_value(&json!({
            "name": "trim|capitalize",
            "email": ["trim", "lowercase"],
        }))
        .unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("email").map(<[RuleDescriptor]>::len), Some(2));
    }

    #[test]
    fn test_from_value_rejects_other_descriptor_types() {
        let err = RuleSpec::from_value(&json!({"age": 5})).unwrap_err();
        assert_eq!(
            err,
            SanitizerError::InvalidRuleType {
                attribute: "age".to_string(),
                found: "a number".to_string()
            }
        );

        let err = RuleSpec::from_value(&json!({"tags": ["trim", {"name": "x"}]})).unwrap_err();
        assert!(matches!(err, SanitizerError::InvalidRuleType { .. }));
    }

    #[test]
    fn test_from_value_requires_mapping() {
        assert!(matches!(
            RuleSpec::from_value(&json!(["trim"])),
            Err(SanitizerError::Config(_))
        ));
        assert!(RuleSpec::from_value(&json!(null)).unwrap().is_empty());
    }
}
