// scrubber-core/src/lib.rs
//! # Scrubber Core Library
//!
//! `scrubber-core` provides declarative sanitization of nested data. Given a
//! document (`serde_json::Value`) and a set of per-attribute rules, it applies
//! named filters such as `trim`, `lowercase` or `escape` to the selected
//! attributes, in the declared order, and returns a sanitized copy.
//!
//! The library is pure: it performs no I/O during sanitization, holds no global
//! state, and never mutates the document it was given.
//!
//! ## Modules
//!
//! * `sanitizer`: The [`Sanitizer`] engine.
//! * `rules`: [`RuleSpec`], the rule-string parser and wildcard expansion.
//! * `filters`: The [`Filter`] contract and the built-in filters.
//! * `registry`: [`FilterRegistry`], name-to-filter lookup with overrides.
//! * `path`: Dotted attribute-path access over JSON values.
//! * `config`: YAML rules documents, default rules, merging, composite filters.
//! * `headless`: One-shot helpers driven by a rules document.
//! * `errors`: [`SanitizerError`].
//!
//! ## Rule strings
//!
//! A rule is `name` or `name:opt1,opt2`. Several rules can be packed into one
//! string with `|`. The special `filter_if:attribute,value` rule keeps the
//! attribute's sanitized value only when `attribute` holds `value`.
//!
//! ## Usage Example
//!
//! ```rust
//! use scrubber_core::{RuleSpec, Sanitizer, SanitizerError};
//! use serde_json::json;
//!
//! fn main() -> Result<(), SanitizerError> {
//!     let data = json!({
//!         "name": "  ada LOVELACE ",
//!         "email": " Ada@Example.COM",
//!         "role": "admin",
//!         "note": "<b>hi</b>",
//!     });
//!     let rules = RuleSpec::new()
//!         .rule("name", "trim|capitalize")
//!         .rule("email", "trim|lowercase")
//!         .rules("note", ["filter_if:role,admin", "strip_tags"]);
//!
//!     let sanitized = Sanitizer::new(data, &rules).sanitize()?;
//!     assert_eq!(sanitized["name"], "Ada Lovelace");
//!     assert_eq!(sanitized["email"], "ada@example.com");
//!     assert_eq!(sanitized["note"], "hi");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The engine returns [`SanitizerError`] for misconfigured rules: unsupported rule
//! types, unknown filter names, and bad filter options. Any error aborts the whole
//! `sanitize()` call. Configuration loading uses `anyhow::Error` with context.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod errors;
pub mod filters;
pub mod headless;
pub mod path;
pub mod registry;
pub mod rules;
pub mod sanitizer;

/// Re-exports the rules-document types and functions.
pub use config::{merge_rules, ChainFilter, RulesConfig};

/// Re-exports the custom error type for clear error reporting.
pub use errors::SanitizerError;

/// Re-exports the filter contract.
pub use filters::{Filter, FilterHandle};

/// Re-exports one-shot helpers.
pub use headless::{headless_sanitize_value, sanitizer_from_config};

pub use registry::FilterRegistry;

/// Re-exports rule specification and parsing types.
pub use rules::{
    parse_rule_string, AttributeRules, ParsedRule, RuleDescriptor, RuleExpander, RuleSpec,
    WildcardExpander,
};

pub use sanitizer::Sanitizer;
