//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "SSMIX_STANDARDS_DIR";

/// File names of the three dictionaries inside a standards directory.
pub const SEGMENT_STRUCTURE_FILE: &str = "SEGMENT_STRUCTURE.json";
pub const DATATYPE_STRUCTURE_FILE: &str = "DATATYPE_STRUCTURE.json";
pub const FIELD_OPTIONS_FILE: &str = "SSMIX2_FIELD_OPTIONS.json";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `SSMIX_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn default_standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}
