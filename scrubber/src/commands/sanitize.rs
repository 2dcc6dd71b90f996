//! `scrubber sanitize`: reads a document, applies the merged rules, writes the result.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use scrubber_core::config::{self, unknown_filter_names, RulesConfig};
use scrubber_core::{sanitizer_from_config, FilterRegistry, Sanitizer};

use crate::cli::{DataFormat, SanitizeCommand};

/// Options for the `sanitize` command, decoupled from `clap`.
#[derive(Debug, Clone, Default)]
pub struct SanitizeOptions {
    pub rules_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub format: Option<DataFormat>,
    pub no_defaults: bool,
    pub pretty: bool,
}

impl From<SanitizeCommand> for SanitizeOptions {
    fn from(cmd: SanitizeCommand) -> Self {
        Self {
            rules_path: cmd.rules,
            input_path: cmd.input_file,
            output_path: cmd.output,
            format: cmd.format,
            no_defaults: cmd.no_defaults,
            pretty: cmd.pretty,
        }
    }
}

/// Builds the rules document: built-in defaults (unless disabled) with the user's
/// rules file merged on top.
pub fn load_rules(rules_path: Option<&Path>, no_defaults: bool) -> Result<RulesConfig> {
    let user = rules_path.map(RulesConfig::load_from_file).transpose()?;
    if no_defaults {
        debug!("Default rules disabled.");
        return Ok(user.unwrap_or_default());
    }
    let defaults = RulesConfig::load_default_rules().context("Failed to load default rules")?;
    Ok(config::merge_rules(defaults, user))
}

/// Parses `text` as a document in `format`.
pub fn parse_document(text: &str, format: DataFormat) -> Result<Value> {
    match format {
        DataFormat::Json => serde_json::from_str(text).context("Input is not valid JSON"),
        DataFormat::Yaml => serde_yml::from_str(text).context("Input is not valid YAML"),
    }
}

/// Serializes `value` in `format`. YAML output is always block style.
pub fn render_document(value: &Value, format: DataFormat, pretty: bool) -> Result<String> {
    let rendered = match format {
        DataFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        DataFormat::Json => serde_json::to_string(value)?,
        DataFormat::Yaml => serde_yml::to_string(value)?,
    };
    Ok(rendered)
}

/// Builds the sanitizer for `data` and lists the filter names `rules` uses that
/// its registry cannot resolve.
pub fn build_sanitizer(data: Value, rules: &RulesConfig) -> Result<(Sanitizer, Vec<String>)> {
    let sanitizer = sanitizer_from_config(data, rules, FilterRegistry::with_defaults())?;
    let unknown = unknown_filter_names(rules, sanitizer.filters());
    Ok((sanitizer, unknown))
}

/// Runs the `sanitize` command.
pub fn run_sanitize(opts: SanitizeOptions) -> Result<()> {
    info!("Starting scrubber sanitize operation.");

    let rules = load_rules(opts.rules_path.as_deref(), opts.no_defaults)?;

    let format = opts
        .format
        .or_else(|| opts.input_path.as_deref().map(DataFormat::from_path))
        .unwrap_or_default();
    let input = read_input(opts.input_path.as_deref())?;
    let data = parse_document(&input, format)?;
    debug!("Parsed {} bytes of {:?} input.", input.len(), format);

    let (sanitizer, unknown) = build_sanitizer(data, &rules)?;
    for name in unknown {
        warn!("Rules refer to unknown filter '{}'; sanitization fails if it is reached.", name);
    }
    let sanitized = sanitizer.sanitize().context("Sanitization failed")?;

    write_output(&sanitized, format, &opts)?;
    info!("Scrubber sanitize operation completed.");
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(value: &Value, format: DataFormat, opts: &SanitizeOptions) -> Result<()> {
    if let Some(path) = &opts.output_path {
        info!("Writing sanitized document to file: {}", path.display());
        let rendered = render_document(value, format, opts.pretty)?;
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        writeln!(file, "{}", rendered.trim_end())?;
    } else {
        let stdout = io::stdout();
        let pretty = opts.pretty || stdout.is_terminal();
        let rendered = render_document(value, format, pretty)?;
        let mut writer = stdout.lock();
        writeln!(writer, "{}", rendered.trim_end())?;
    }
    Ok(())
}
