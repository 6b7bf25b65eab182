use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal conditions recorded while decoding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A DT/DTM/TM value does not match its pattern; replaced with empty text.
    MalformedTemporalValue,
    /// An NM value does not parse as a number; replaced with null.
    MalformedNumericValue,
    /// An escape sequence is not closed; resolved best-effort.
    UnclosedEscapeSequence,
    /// OBX-2 names a type outside HL7 table 0125; OBX-5 is dropped.
    UnknownObservationValueType,
    /// The category grammar has no placement for the segment; segment dropped.
    UnknownSegmentForCategory,
    /// The segment's target group has not been opened yet; segment dropped.
    OrphanSegment,
    /// The configured category differs from the assembler's own.
    CategoryMismatch,
    /// A subcomponent declares a complex type; raw text kept.
    NestedSubcomponent,
    /// No schema entry for a field sequence; raw text kept.
    UnknownField,
    /// No schema entry for a component index; raw text kept.
    UnknownComponent,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedTemporalValue => "malformed_temporal_value",
            Self::MalformedNumericValue => "malformed_numeric_value",
            Self::UnclosedEscapeSequence => "unclosed_escape_sequence",
            Self::UnknownObservationValueType => "unknown_observation_value_type",
            Self::UnknownSegmentForCategory => "unknown_segment_for_category",
            Self::OrphanSegment => "orphan_segment",
            Self::CategoryMismatch => "category_mismatch",
            Self::NestedSubcomponent => "nested_subcomponent",
            Self::UnknownField => "unknown_field",
            Self::UnknownComponent => "unknown_component",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue found while decoding one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Segment tag (e.g. "OBX"), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    /// Field location (e.g. "OBX-5"), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            segment: None,
            field: None,
        }
    }

    pub fn in_segment(mut self, tag: impl Into<String>) -> Self {
        self.segment = Some(tag.into());
        self
    }

    pub fn at_field(mut self, tag: &str, sequence: usize) -> Self {
        self.segment = Some(tag.to_string());
        self.field = Some(format!("{tag}-{sequence}"));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.field, &self.segment) {
            (Some(field), _) => write!(f, "[{}] {}: {}", self.kind, field, self.message),
            (None, Some(segment)) => write!(f, "[{}] {}: {}", self.kind, segment, self.message),
            (None, None) => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}
