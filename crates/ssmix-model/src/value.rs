use serde::ser::{Serialize, Serializer};

use crate::ordered::OrderedMap;

/// Text stored in place of any redacted segment, field or component.
pub const REDACTED: &str = "**DEIDENTIFIED**";

/// Ordered mapping of element name to decoded value.
pub type ValueMap = OrderedMap<String, DecodedValue>;

/// One decoded field, component or subcomponent.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    /// A numeric value that failed validation.
    Null,
    /// A primitive value, kept as text.
    Text(String),
    /// A complex value: component name to component value.
    Composite(ValueMap),
    /// All non-empty repetitions of a repeatable field.
    Repeated(Vec<DecodedValue>),
    /// A value removed by the de-identification policy.
    Redacted,
}

impl DecodedValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&ValueMap> {
        match self {
            Self::Composite(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[DecodedValue]> {
        match self {
            Self::Repeated(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted)
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Composite(map) => map.serialize(serializer),
            Self::Repeated(values) => values.serialize(serializer),
            Self::Redacted => serializer.serialize_str(REDACTED),
        }
    }
}
