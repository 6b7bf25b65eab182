//! TOML configuration file.
//!
//! ```toml
//! [jsonizer]
//! deidentify = true
//! strict_usage_filtering = true
//!
//! [jsonizer.nesting]
//! prefix = ""
//! suffix = "_Nested"
//!
//! [jsonizer.field_names]
//! sequence_prefixed = true
//! language = "ja"
//!
//! [read]
//! encoding = "iso-2022-jp"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use ssmix_ingest::ReadOptions;
use ssmix_model::JsonizerOptions;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub jsonizer: JsonizerOptions,
    pub read: ReadOptions,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}
