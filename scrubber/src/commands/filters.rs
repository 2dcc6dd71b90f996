//! `scrubber filters`: lists every filter name a rule can refer to.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use std::io::{self, Write};

use scrubber_core::FilterRegistry;

use crate::cli::FiltersCommand;
use crate::commands::sanitize::load_rules;

/// Filter names available with the given rules file, sorted.
pub fn available_filters(cmd: &FiltersCommand) -> Result<Vec<String>> {
    let rules = load_rules(cmd.rules.as_deref(), cmd.no_defaults)?;
    let mut registry = FilterRegistry::with_defaults();
    rules
        .register_into(&mut registry)
        .context("Failed to register composite filters")?;
    Ok(registry.names().into_iter().map(str::to_string).collect())
}

/// Runs the `filters` command, one name per line on stdout.
pub fn run_filters(cmd: &FiltersCommand) -> Result<()> {
    let names = available_filters(cmd)?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    for name in names {
        writeln!(writer, "{}", name)?;
    }
    Ok(())
}
