//! CLI argument definitions for the SS-MIX2 jsonizer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ssmix_model::{Category, Language};

#[derive(Parser)]
#[command(
    name = "ssmix-jsonizer",
    version,
    about = "SS-MIX2 Jsonizer - Convert SS-MIX2 HL7 v2 messages to JSON",
    long_about = "Convert messages from SS-MIX2 standardized storage to JSON documents.\n\n\
                  Segments are decoded with the SS-MIX2 schema dictionaries and grouped\n\
                  per data category. Patient identifiers are de-identified by default."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow message values (PHI) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Directory holding manifest.toml and the schema dictionaries
    /// (default: $SSMIX_STANDARDS_DIR, else the bundled standards).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert message files or storage trees to NDJSON.
    Jsonize(JsonizeArgs),

    /// List the supported data categories.
    Categories,

    /// Verify the schema dictionaries and print a report.
    Standards,
}

#[derive(Args)]
pub struct JsonizeArgs {
    /// Message files or SS-MIX2 storage directories.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Data category of every message (default: inferred from file names).
    #[arg(long = "category", value_name = "CATEGORY", value_parser = parse_category)]
    pub category: Option<Category>,

    /// Write NDJSON here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit {file, category, document, diagnostics} records instead of bare documents.
    #[arg(long = "with-diagnostics")]
    pub with_diagnostics: bool,

    /// Keep patient identifiers (skip de-identification).
    #[arg(long = "keep-identifiers")]
    pub keep_identifiers: bool,

    /// Keep fields the category's usage table marks as not used.
    #[arg(long = "no-usage-filter")]
    pub no_usage_filter: bool,

    /// Prefix of group array and nested field names.
    #[arg(long = "nest-prefix", value_name = "TEXT")]
    pub nest_prefix: Option<String>,

    /// Suffix of group array and nested field names (default: _Nested).
    #[arg(long = "nest-suffix", value_name = "TEXT")]
    pub nest_suffix: Option<String>,

    /// Language of field names.
    #[arg(long = "field-lang", value_enum)]
    pub field_lang: Option<LanguageArg>,

    /// Language of component names.
    #[arg(long = "element-lang", value_enum)]
    pub element_lang: Option<LanguageArg>,

    /// Drop the sequence prefix from field and component names.
    #[arg(long = "plain-names")]
    pub plain_names: bool,

    /// Encoding label of the message files (default: iso-2022-jp).
    #[arg(long = "encoding", value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Load the dictionaries without checking manifest checksums.
    #[arg(long = "unverified-standards")]
    pub unverified_standards: bool,
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|error: ssmix_model::JsonizeError| error.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    En,
    Ja,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::En => Language::En,
            LanguageArg::Ja => Language::Ja,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
