//! SS-MIX2 message sourcing.
//!
//! Messages in SS-MIX2 standardized storage are files named after the
//! patient, date and data category they belong to, encoded in ISO-2022-JP.
//! This crate finds them, decodes them to text and reads their category from
//! the file name.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ssmix_ingest::{ReadOptions, discover_messages, infer_category, read_message};
//!
//! let options = ReadOptions::default();
//! for path in discover_messages(Path::new("storage"))? {
//!     let category = infer_category(&path);
//!     let message = read_message(&path, &options)?;
//! }
//! ```

mod discovery;
mod error;
mod filename;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Message Reading ===
pub use reader::{DEFAULT_ENCODING, MAX_MESSAGE_FILE_SIZE, ReadOptions, read_message};

// === Storage Discovery ===
pub use discovery::discover_messages;

// === File Names ===
pub use filename::{StorageFileName, infer_category};
