use ssmix_model::{JsonizeError, Result};

/// Tag of the message header segment that announces the delimiters.
pub const HEADER_TAG: &str = "MSH";

/// The five separator characters of an HL7 v2 message.
///
/// They are read from positions 3..8 of the `MSH` segment: field separator,
/// then the four encoding characters in the order component, repetition,
/// escape, subcomponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterSet {
    pub field: char,
    pub component: char,
    pub repetition: char,
    pub escape: char,
    pub subcomponent: char,
}

impl Default for DelimiterSet {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl DelimiterSet {
    /// Read the delimiters from a raw header segment.
    pub fn from_header(segment: &str) -> Result<Self> {
        let chars: Vec<char> = segment.chars().skip(HEADER_TAG.len()).take(5).collect();
        match chars[..] {
            [field, component, repetition, escape, subcomponent] => Ok(Self {
                field,
                component,
                repetition,
                escape,
                subcomponent,
            }),
            _ => Err(JsonizeError::structural(
                HEADER_TAG,
                format!(
                    "header carries {} of 5 delimiter characters",
                    chars.len()
                ),
            )),
        }
    }

    /// The encoding characters as they appear in MSH-2.
    pub fn encoding_characters(&self) -> String {
        [self.component, self.repetition, self.escape, self.subcomponent]
            .iter()
            .collect()
    }
}
