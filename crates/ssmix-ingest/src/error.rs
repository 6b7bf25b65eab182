//! Error types for message ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or reading messages.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Message file not found.
    #[error("message file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is {size} bytes, limit is {max_size}")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Decoding Errors ===
    /// The configured encoding label is not a WHATWG encoding.
    #[error("unsupported encoding label '{label}'")]
    UnsupportedEncoding { label: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/storage/000/000/0000000001/20210805/OMP-11/msg"),
        };
        assert_eq!(
            err.to_string(),
            "message file not found: /storage/000/000/0000000001/20210805/OMP-11/msg"
        );
        let err = IngestError::UnsupportedEncoding {
            label: "ebcdic".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported encoding label 'ebcdic'");
    }
}
