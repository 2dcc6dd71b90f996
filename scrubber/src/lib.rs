// scrubber/src/lib.rs
//! # Scrubber CLI Application
//!
//! This crate provides the command-line front-end for the `scrubber-core`
//! sanitization engine: argument parsing, logger setup, and the `sanitize` and
//! `filters` subcommands.

pub mod cli;
pub mod commands;
pub mod logger;

pub use commands::filters::run_filters;
pub use commands::sanitize::{run_sanitize, SanitizeOptions};
