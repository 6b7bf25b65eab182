//! Message file reading.

use std::path::Path;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// SS-MIX2 storage files are ISO-2022-JP encoded.
pub const DEFAULT_ENCODING: &str = "iso-2022-jp";

/// Maximum size of a single message file (16 MB default).
pub const MAX_MESSAGE_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// How message files are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// WHATWG encoding label of the message files.
    pub encoding: String,
    pub max_file_size: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            max_file_size: MAX_MESSAGE_FILE_SIZE,
        }
    }
}

impl ReadOptions {
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    /// Resolve the configured label.
    pub fn resolve_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            IngestError::UnsupportedEncoding {
                label: self.encoding.clone(),
            }
        })
    }
}

/// Read a message file and decode it to text.
///
/// A byte order mark overrides the configured encoding. Malformed byte
/// sequences are replaced with U+FFFD and logged; they do not fail the read.
pub fn read_message(path: &Path, options: &ReadOptions) -> Result<String> {
    let encoding = options.resolve_encoding()?;
    check_file_size(path, options.max_file_size)?;

    let bytes = std::fs::read(path).map_err(|e| file_error(path, e))?;
    let (text, actual, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = actual.name(),
            "malformed byte sequences replaced while decoding message"
        );
    }
    tracing::debug!(
        path = %path.display(),
        encoding = actual.name(),
        bytes = bytes.len(),
        "message read"
    );
    Ok(text.into_owned())
}

fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| file_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

fn file_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::ISO_2022_JP;
    use tempfile::TempDir;

    #[test]
    fn test_default_encoding_resolves() {
        let encoding = ReadOptions::default().resolve_encoding().unwrap();
        assert_eq!(encoding, ISO_2022_JP);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let options = ReadOptions::default().with_encoding("klingon");
        assert!(matches!(
            options.resolve_encoding(),
            Err(IngestError::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn test_reads_iso_2022_jp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("message");
        let (bytes, _, _) = ISO_2022_JP.encode("PID|1||1234567^^^^PI||山田^太郎\r");
        std::fs::write(&path, &bytes).unwrap();

        let text = read_message(&path, &ReadOptions::default()).unwrap();
        assert_eq!(text, "PID|1||1234567^^^^PI||山田^太郎\r");
    }

    #[test]
    fn test_reads_other_encodings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("message");
        std::fs::write(&path, "PID|1||||山田^太郎").unwrap();

        let options = ReadOptions::default().with_encoding("utf-8");
        assert_eq!(read_message(&path, &options).unwrap(), "PID|1||||山田^太郎");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_message(&dir.path().join("absent"), &ReadOptions::default());
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_file_too_large() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("message");
        std::fs::write(&path, "MSH|^~\\&|HIS").unwrap();

        let options = ReadOptions {
            max_file_size: 4,
            ..ReadOptions::default()
        };
        assert!(matches!(
            read_message(&path, &options),
            Err(IngestError::FileTooLarge { size: 12, .. })
        ));
    }
}
