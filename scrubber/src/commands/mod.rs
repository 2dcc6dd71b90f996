//! Subcommand implementations.

pub mod filters;
pub mod sanitize;
