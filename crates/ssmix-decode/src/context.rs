use ssmix_model::{Diagnostic, DiagnosticKind, redact_value};

use crate::delimiters::DelimiterSet;

/// Per-message decoding state.
///
/// Holds the delimiters of the message being decoded (replaced when its
/// header is read) and the diagnostics recorded so far. One context is used
/// for exactly one message.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    delimiters: DelimiterSet,
    diagnostics: Vec<Diagnostic>,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(delimiters: DelimiterSet) -> Self {
        Self {
            delimiters,
            diagnostics: Vec::new(),
        }
    }

    pub fn delimiters(&self) -> DelimiterSet {
        self.delimiters
    }

    pub fn set_delimiters(&mut self, delimiters: DelimiterSet) {
        self.delimiters = delimiters;
    }

    /// Record a diagnostic and emit it as a warning.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            segment = diagnostic.segment.as_deref().unwrap_or(""),
            field = diagnostic.field.as_deref().unwrap_or(""),
            detail = redact_value(&diagnostic.message),
            "decode diagnostic"
        );
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Segment tag and field sequence a value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation<'a> {
    pub tag: &'a str,
    pub sequence: usize,
}

impl<'a> FieldLocation<'a> {
    pub fn new(tag: &'a str, sequence: usize) -> Self {
        Self { tag, sequence }
    }

    pub fn diagnostic(&self, kind: DiagnosticKind, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(kind, message).at_field(self.tag, self.sequence)
    }
}
