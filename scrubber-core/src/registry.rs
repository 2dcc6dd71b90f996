//! Name-to-filter lookup for a sanitizer instance.
//!
//! Each `Sanitizer` owns its own registry: the built-in filters are registered at
//! construction and caller-supplied filters are merged on top, replacing built-ins
//! that share their name. There is no process-wide registry.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::errors::SanitizerError;
use crate::filters::{self, Filter, FilterHandle};

/// Mapping from filter name to filter implementation.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterHandle>,
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

impl FilterRegistry {
    /// An empty registry. Mostly useful for tests; see [`FilterRegistry::with_defaults`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in filter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(filters::CAPITALIZE, filters::Capitalize)
            .register(filters::CAST, filters::Cast)
            .register(filters::DIGIT, filters::Digit)
            .register(filters::ESCAPE, filters::EscapeHtml)
            .register(filters::FILTER_IF, filters::FilterIf)
            .register(filters::FORMAT_DATE, filters::FormatDate)
            .register(filters::LOWERCASE, filters::Lowercase)
            .register(filters::STRIP_TAGS, filters::StripTags)
            .register(filters::TRIM, filters::Trim)
            .register(filters::UPPERCASE, filters::Uppercase);
        registry
    }

    /// Adds `filter` under `name`, replacing any filter already registered there.
    pub fn register(&mut self, name: impl Into<String>, filter: impl Filter + 'static) -> &mut Self {
        self.insert_handle(name.into(), Arc::new(filter))
    }

    /// Adds a closure under `name`, replacing any filter already registered there.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Value, &[String]) -> Result<Value, SanitizerError> + Send + Sync + 'static,
    {
        self.insert_handle(name.into(), filters::from_fn(f))
    }

    /// Adds an already shared handle under `name`.
    pub fn register_handle(&mut self, name: impl Into<String>, handle: FilterHandle) -> &mut Self {
        self.insert_handle(name.into(), handle)
    }

    fn insert_handle(&mut self, name: String, handle: FilterHandle) -> &mut Self {
        if self.filters.insert(name.clone(), handle).is_some() {
            debug!("Filter '{}' replaced by a custom registration.", name);
        }
        self
    }

    /// Merges `overrides` on top of this registry. Later entries win.
    pub fn extend<I, S>(&mut self, overrides: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, FilterHandle)>,
        S: Into<String>,
    {
        for (name, handle) in overrides {
            self.insert_handle(name.into(), handle);
        }
        self
    }

    /// Looks up the filter registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&FilterHandle, SanitizerError> {
        self.filters
            .get(name)
            .ok_or_else(|| SanitizerError::UnknownFilter(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
