//! Read-only schema dictionaries consumed by the decoder.
//!
//! The tables mirror the three SS-MIX2 dictionaries: segment structure
//! (fields by sequence), data type structure (components by index) and the
//! per-category field usage table.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::options::{Language, NameStyle};

/// The four name variants carried by every schema entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameVariants {
    #[serde(rename = "Name_seq_en", default)]
    pub seq_en: Option<String>,
    #[serde(rename = "Name_en", default)]
    pub en: Option<String>,
    #[serde(rename = "Name_seq_ja", default)]
    pub seq_ja: Option<String>,
    #[serde(rename = "Name_ja", default)]
    pub ja: Option<String>,
}

impl NameVariants {
    /// Returns the variant selected by `style`, falling back to the English
    /// variant with the same prefixing. Empty names count as missing.
    pub fn resolve(&self, style: NameStyle) -> Option<&str> {
        let (wanted, fallback) = match (style.sequence_prefixed, style.language) {
            (true, Language::En) => (&self.seq_en, &self.seq_en),
            (false, Language::En) => (&self.en, &self.en),
            (true, Language::Ja) => (&self.seq_ja, &self.seq_en),
            (false, Language::Ja) => (&self.ja, &self.en),
        };
        wanted
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| fallback.as_deref().filter(|name| !name.is_empty()))
    }
}

/// One field of a segment, addressed by 1-based sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SegmentFieldDef {
    #[serde(flatten)]
    pub names: NameVariants,
    #[serde(rename = "DataType", default)]
    pub data_type: String,
    #[serde(rename = "Repeatability", default, deserialize_with = "truthy")]
    pub repeatable: bool,
}

/// One component (or subcomponent) of a complex data type, addressed by 0-based index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComponentDef {
    #[serde(flatten)]
    pub names: NameVariants,
    #[serde(rename = "DataType", default)]
    pub data_type: String,
}

/// Profile usage of a field within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Usage {
    Required,
    Optional,
    NotUsed,
}

impl Usage {
    /// `R` is required, `N` is not used, every other code is optional.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "R" => Usage::Required,
            "N" => Usage::NotUsed,
            _ => Usage::Optional,
        }
    }
}

impl From<String> for Usage {
    fn from(value: String) -> Self {
        Usage::from_code(&value)
    }
}

/// Segment tag to field definitions, index 0 being the tag itself.
pub type SegmentStructure = BTreeMap<String, Vec<SegmentFieldDef>>;
/// Complex data type to component definitions.
pub type DataTypeStructure = BTreeMap<String, Vec<ComponentDef>>;
/// Usage key to segment tag to usage codes by sequence.
pub type UsageTable = BTreeMap<String, BTreeMap<String, Vec<Usage>>>;

#[derive(Debug, Clone, Default)]
pub struct SchemaTables {
    segments: SegmentStructure,
    data_types: DataTypeStructure,
    usage: UsageTable,
}

impl SchemaTables {
    pub fn new(segments: SegmentStructure, data_types: DataTypeStructure, usage: UsageTable) -> Self {
        Self {
            segments,
            data_types,
            usage,
        }
    }

    /// Parse the three dictionaries from their JSON documents.
    pub fn from_json(
        segments: &str,
        data_types: &str,
        usage: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            serde_json::from_str(segments)?,
            serde_json::from_str(data_types)?,
            serde_json::from_str(usage)?,
        ))
    }

    pub fn field(&self, tag: &str, sequence: usize) -> Option<&SegmentFieldDef> {
        self.segments.get(tag).and_then(|fields| fields.get(sequence))
    }

    pub fn component(&self, data_type: &str, index: usize) -> Option<&ComponentDef> {
        self.data_types
            .get(data_type)
            .and_then(|components| components.get(index))
    }

    pub fn has_data_type(&self, data_type: &str) -> bool {
        self.data_types.contains_key(data_type)
    }

    /// Usage of a field, or `None` when the table has no entry for it.
    pub fn usage(&self, usage_key: &str, tag: &str, sequence: usize) -> Option<Usage> {
        self.usage
            .get(usage_key)
            .and_then(|segments| segments.get(tag))
            .and_then(|codes| codes.get(sequence))
            .copied()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn data_type_count(&self) -> usize {
        self.data_types.len()
    }

    pub fn usage_keys(&self) -> impl Iterator<Item = &str> {
        self.usage.keys().map(String::as_str)
    }
}

/// Interprets a JSON value the way the dictionaries use it: `false`, `0`,
/// empty strings and `null` are false, everything else is true.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    })
}
