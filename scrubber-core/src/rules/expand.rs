//! Expansion of a [`RuleSpec`] into concrete attribute paths.
//!
//! Expansion runs once, against the input document, before parsing. It explodes
//! packed rule strings (`"trim|lowercase"`) into single descriptors and resolves
//! wildcard segments (`"users.*.email"`) to every matching path that exists in the
//! data. The sanitizer only ever sees the flat result.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;

use log::{debug, trace};
use serde_json::Value;

use super::{RuleDescriptor, RuleSpec, RULE_SEPARATOR};
use crate::path::{self, PATH_SEPARATOR};

/// Wildcard marker inside an attribute path segment.
pub const WILDCARD: char = '*';

/// Concrete attribute path to its exploded descriptors, in application order.
pub type ExpandedRules = Vec<(String, Vec<RuleDescriptor>)>;

/// Turns a rule spec into a flat, concrete rule map for a given document.
pub trait RuleExpander: Send + Sync {
    fn expand(&self, rules: &RuleSpec, data: &Value) -> ExpandedRules;
}

/// The default expander.
///
/// A segment containing `*` matches the keys of a mapping, or the indices of a
/// sequence, where `*` stands for any run of characters (`"*"`, `"phone_*"`).
/// Rules that several entries give to the same concrete path are concatenated in
/// rule-map order.
#[derive(Debug, Default, Clone, Copy)]
pub struct WildcardExpander;

impl RuleExpander for WildcardExpander {
    fn expand(&self, rules: &RuleSpec, data: &Value) -> ExpandedRules {
        let mut expanded: ExpandedRules = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (attribute, descriptors) in rules.iter() {
            let exploded = explode(descriptors);
            if attribute.contains(WILDCARD) {
                let concrete = concrete_paths(attribute, data);
                trace!("Wildcard attribute '{}' matched {} path(s).", attribute, concrete.len());
                for path in concrete {
                    if path::get(data, &path).is_none() {
                        debug!(
                            "Wildcard attribute '{}' matched '{}', which cannot be addressed as a dotted path; skipping it.",
                            attribute, path
                        );
                        continue;
                    }
                    merge(&mut expanded, &mut positions, path, &exploded);
                }
            } else {
                merge(&mut expanded, &mut positions, attribute.to_string(), &exploded);
            }
        }

        debug!(
            "Expanded {} rule entries into {} concrete attribute(s).",
            rules.len(),
            expanded.len()
        );
        expanded
    }
}

fn merge(
    expanded: &mut ExpandedRules,
    positions: &mut HashMap<String, usize>,
    path: String,
    descriptors: &[RuleDescriptor],
) {
    match positions.get(&path) {
        Some(&at) => expanded[at].1.extend_from_slice(descriptors),
        None => {
            positions.insert(path.clone(), expanded.len());
            expanded.push((path, descriptors.to_vec()));
        }
    }
}

/// Splits packed `a|b` rule strings into one descriptor each.
fn explode(descriptors: &[RuleDescriptor]) -> Vec<RuleDescriptor> {
    descriptors
        .iter()
        .flat_map(|descriptor| match descriptor {
            RuleDescriptor::Text(text) if text.contains(RULE_SEPARATOR) => text
                .split(RULE_SEPARATOR)
                .map(|part| RuleDescriptor::Text(part.to_string()))
                .collect::<Vec<_>>(),
            other => vec![other.clone()],
        })
        .collect()
}

/// Every existing path in `data` matching the wildcard `pattern`, in data order.
pub fn concrete_paths(pattern: &str, data: &Value) -> Vec<String> {
    let segments: Vec<&str> = pattern.split(PATH_SEPARATOR).collect();
    let mut found = Vec::new();
    collect(data, &segments, String::new(), &mut found);
    found
}

fn collect(node: &Value, segments: &[&str], prefix: String, found: &mut Vec<String>) {
    let Some((segment, rest)) = segments.split_first() else {
        found.push(prefix);
        return;
    };

    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{key}")
        }
    };

    match node {
        Value::Object(map) => {
            for (key, child) in map {
                if segment_matches(segment, key) {
                    collect(child, rest, join(key.as_str()), found);
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let key = index.to_string();
                if segment_matches(segment, &key) {
                    collect(child, rest, join(key.as_str()), found);
                }
            }
        }
        _ => {}
    }
}

fn segment_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains(WILDCARD) {
        return pattern == key;
    }
    glob_match(pattern, key)
}

/// `*`-only glob match over whole strings.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split(WILDCARD);
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let mut parts: Vec<&str> = parts.collect();
    let last = parts.pop().unwrap_or_default();
    for part in parts {
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}
