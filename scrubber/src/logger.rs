// scrubber/src/logger.rs
//! Logger setup for the scrubber binary.
//!
//! Logs go to stderr so they never mix with the sanitized document on stdout.
//! `RUST_LOG` is honoured unless a level override is passed in.
//! License: MIT OR APACHE 2.0

use log::LevelFilter;

/// Initializes `env_logger`.
///
/// With `Some(level)`, that level applies to every module regardless of
/// `RUST_LOG`. With `None`, `RUST_LOG` decides and defaults to `warn`.
/// Calling this more than once is harmless.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

/// Maps the global `--quiet` / `--debug` flags to a level override.
pub fn level_for_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
