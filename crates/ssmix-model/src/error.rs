use thiserror::Error;

/// Fatal decode failures. Everything else is reported as a [`crate::Diagnostic`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonizeError {
    /// The message cannot be decoded at all (e.g. header too short to carry delimiters).
    #[error("structural error in {segment} segment: {message}")]
    Structural { segment: String, message: String },
    #[error("unknown message category: {0}")]
    UnknownCategory(String),
}

impl JsonizeError {
    pub fn structural(segment: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structural {
            segment: segment.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JsonizeError>;
