//! Message discovery in SS-MIX2 storage trees.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists every message file below `root`.
///
/// Standardized storage nests messages several directories deep
/// (`<id[0..3]>/<id[3..6]>/<id>/<date>/<category>/`), so the walk is
/// recursive. Hidden files and directories are skipped. Returns files sorted
/// by path.
pub fn discover_messages(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| IngestError::DirectoryRead {
            path: dir.clone(),
            source: e,
        })?;

        for entry_result in entries {
            let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();

            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if hidden {
                continue;
            }

            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), files = files.len(), "messages discovered");
    Ok(files)
}
