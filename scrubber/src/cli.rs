// scrubber/src/cli.rs
//! This file defines the command-line interface (CLI) for the scrubber application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "scrubber",
    author = "Obscura Tech",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sanitize JSON and YAML documents with declarative per-attribute rules",
    long_about = "Scrubber applies named filters (trim, lowercase, escape, strip_tags, cast, format_date, ...) to the attributes of a JSON or YAML document, as declared in a rules file. Attribute paths use dot notation and may contain '*' wildcards.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG to DEBUG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `scrubber` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes a document from a file or stdin.
    #[command(about = "Sanitizes a JSON or YAML document from a file or stdin.")]
    Sanitize(SanitizeCommand),

    /// Lists the filter names available to rules.
    #[command(about = "Lists the filter names available to rules.")]
    Filters(FiltersCommand),
}

/// Serialization format of input and output documents.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    #[default]
    Json,
    Yaml,
}

impl DataFormat {
    /// Picks the format from a file extension: `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => DataFormat::Yaml,
            _ => DataFormat::Json,
        }
    }
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// Path to a rules file (YAML or JSON).
    #[arg(long = "rules", short = 'r', value_name = "FILE", env = "SCRUBBER_RULES", help = "Path to a rules file (YAML or JSON).")]
    pub rules: Option<PathBuf>,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Format of the input and output documents (inferred from the input file extension when omitted).
    #[arg(long = "format", short = 'f', value_enum, help = "Format of the input and output documents (json or yaml).")]
    pub format: Option<DataFormat>,

    /// Do not load the built-in default rules.
    #[arg(long = "no-defaults", help = "Use only the rules file, without the built-in default rules.")]
    pub no_defaults: bool,

    /// Pretty-print JSON output.
    #[arg(long, short = 'p', help = "Pretty-print JSON output (default when writing to a terminal).")]
    pub pretty: bool,
}

/// Arguments for the `filters` command.
#[derive(Parser, Debug)]
pub struct FiltersCommand {
    /// Include composite filters defined in this rules file.
    #[arg(long = "rules", short = 'r', value_name = "FILE", env = "SCRUBBER_RULES", help = "Include composite filters defined in this rules file.")]
    pub rules: Option<PathBuf>,

    /// Do not include composite filters from the built-in default rules.
    #[arg(long = "no-defaults", help = "Do not include composite filters from the built-in default rules.")]
    pub no_defaults: bool,
}
