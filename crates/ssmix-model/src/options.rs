//! Configuration options for jsonizing SS-MIX2 messages.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Language of field and element names taken from the schema dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

/// Which name variant of a schema entry to use as output key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameStyle {
    /// Prefix names with their sequence (e.g. `PID-5 Patient Name`).
    pub sequence_prefixed: bool,
    pub language: Language,
}

impl Default for NameStyle {
    fn default() -> Self {
        Self {
            sequence_prefixed: true,
            language: Language::En,
        }
    }
}

/// Naming of group arrays and repeatable complex fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestNaming {
    pub prefix: String,
    pub suffix: String,
}

impl Default for NestNaming {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: "_Nested".to_string(),
        }
    }
}

impl NestNaming {
    /// Render the nested variant of `name` (e.g. `ORDER` -> `ORDER_Nested`).
    pub fn nested(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}

/// Options controlling how messages are decoded and assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonizerOptions {
    /// Apply the de-identification policy.
    pub deidentify: bool,

    /// Naming of group arrays and nested repeatable fields.
    pub nesting: NestNaming,

    /// Naming of segment fields.
    pub field_names: NameStyle,

    /// Naming of components and subcomponents.
    pub element_names: NameStyle,

    /// Drop fields the category's usage table marks as not used.
    pub strict_usage_filtering: bool,

    /// Expected category. An assembler built for a different category
    /// records a mismatch diagnostic and keeps its own category.
    pub category: Option<Category>,
}

impl Default for JsonizerOptions {
    fn default() -> Self {
        Self {
            deidentify: true,
            nesting: NestNaming::default(),
            field_names: NameStyle::default(),
            element_names: NameStyle::default(),
            strict_usage_filtering: true,
            category: None,
        }
    }
}

impl JsonizerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deidentify(mut self, enable: bool) -> Self {
        self.deidentify = enable;
        self
    }

    pub fn with_nesting(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.nesting = NestNaming {
            prefix: prefix.into(),
            suffix: suffix.into(),
        };
        self
    }

    pub fn with_field_names(mut self, style: NameStyle) -> Self {
        self.field_names = style;
        self
    }

    pub fn with_element_names(mut self, style: NameStyle) -> Self {
        self.element_names = style;
        self
    }

    pub fn with_strict_usage_filtering(mut self, enable: bool) -> Self {
        self.strict_usage_filtering = enable;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }
}
