#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use ssmix_model::SchemaTables;

use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::manifest::{Manifest, ManifestFile, Pins};
use crate::paths::{DATATYPE_STRUCTURE_FILE, FIELD_OPTIONS_FILE, SEGMENT_STRUCTURE_FILE};

const MANIFEST_SCHEMA: &str = "ssmix-jsonizer.standards-manifest";

const SEGMENT_STRUCTURE_ROLE: &str = "segment_structure";
const DATATYPE_STRUCTURE_ROLE: &str = "datatype_structure";
const FIELD_OPTIONS_ROLE: &str = "field_options";

const REQUIRED_ROLES: &[&str] = &[
    SEGMENT_STRUCTURE_ROLE,
    DATATYPE_STRUCTURE_ROLE,
    FIELD_OPTIONS_ROLE,
];

const ALLOWED_KINDS: &[&str] = &["json", "toml", "other"];

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub manifest_pins: Pins,
    pub file_count: usize,
    pub segment_count: usize,
    pub data_type_count: usize,
    pub usage_categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StandardsRegistry {
    pub manifest: Manifest,
    pub files: Vec<ManifestFile>,
    pub schema: SchemaTables,
}

impl StandardsRegistry {
    /// Verify every file pinned by `manifest.toml` and load the dictionaries.
    pub fn verify_and_load(standards_dir: &Path) -> Result<(Self, VerifySummary), StandardsError> {
        let manifest = load_manifest(&standards_dir.join("manifest.toml"))?;

        validate_manifest(&manifest, standards_dir)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        for file in &files {
            verify_file(standards_dir, file)?;
        }

        let schema = SchemaTables::new(
            read_json(&resolve_role_path(standards_dir, &files, SEGMENT_STRUCTURE_ROLE)?)?,
            read_json(&resolve_role_path(standards_dir, &files, DATATYPE_STRUCTURE_ROLE)?)?,
            read_json(&resolve_role_path(standards_dir, &files, FIELD_OPTIONS_ROLE)?)?,
        );

        let summary = VerifySummary {
            standards_dir: standards_dir.to_path_buf(),
            manifest_pins: manifest.pins.clone(),
            file_count: files.len(),
            segment_count: schema.segment_count(),
            data_type_count: schema.data_type_count(),
            usage_categories: schema.usage_keys().map(str::to_string).collect(),
        };
        tracing::debug!(
            dir = %standards_dir.display(),
            segments = summary.segment_count,
            data_types = summary.data_type_count,
            "loaded schema dictionaries"
        );

        Ok((
            Self {
                manifest,
                files,
                schema,
            },
            summary,
        ))
    }
}

/// Load the dictionaries by their canonical file names without a manifest.
pub fn load_unverified(standards_dir: &Path) -> Result<SchemaTables, StandardsError> {
    tracing::warn!(
        dir = %standards_dir.display(),
        "loading schema dictionaries without manifest verification"
    );
    Ok(SchemaTables::new(
        read_json(&standards_dir.join(SEGMENT_STRUCTURE_FILE))?,
        read_json(&standards_dir.join(DATATYPE_STRUCTURE_FILE))?,
        read_json(&standards_dir.join(FIELD_OPTIONS_FILE))?,
    ))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| StandardsError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest, standards_dir: &Path) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    let mut manifest_paths: BTreeSet<PathBuf> = BTreeSet::new();

    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(StandardsError::DuplicateRole {
                role: file.role.clone(),
            });
        }

        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(StandardsError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", file.kind, file.path),
            });
        }

        validate_sha(&file.sha256, &file.path)?;

        let path = validate_path(&file.path)?;
        manifest_paths.insert(normalize_path(&path));
    }

    for role in REQUIRED_ROLES {
        if !roles.contains(role) {
            return Err(StandardsError::MissingRole {
                role: (*role).to_string(),
            });
        }
    }

    for path in list_files_under(standards_dir)? {
        if path == Path::new("manifest.toml") {
            continue;
        }
        if !manifest_paths.contains(&normalize_path(&path)) {
            return Err(StandardsError::UnexpectedFile {
                path: standards_dir.join(path),
            });
        }
    }

    Ok(())
}

fn verify_file(standards_dir: &Path, file: &ManifestFile) -> Result<(), StandardsError> {
    let full_path = standards_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            StandardsError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn resolve_role_path(
    standards_dir: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Result<PathBuf, StandardsError> {
    let f = files
        .iter()
        .find(|f| f.role == role)
        .ok_or_else(|| StandardsError::MissingRole {
            role: role.to_string(),
        })?;
    Ok(standards_dir.join(&f.path))
}

fn validate_sha(sha: &str, path: &str) -> Result<(), StandardsError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, StandardsError> {
    if path.contains('\\') {
        return Err(StandardsError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }

    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }

    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must not traverse out of standards/".to_string(),
        });
    }

    Ok(p)
}

fn list_files_under(root: &Path) -> Result<BTreeSet<PathBuf>, StandardsError> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = BTreeSet::new();

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| StandardsError::io(&dir, e))? {
            let entry = entry.map_err(|e| StandardsError::io(&dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| StandardsError::InvalidPath {
                        path: path.clone(),
                        message: format!("failed to relativize path: {e}"),
                    })?
                    .to_path_buf();
                files.insert(rel);
            }
        }
    }

    Ok(files)
}

fn normalize_path(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsafe_paths() {
        assert!(validate_path("../SEGMENT_STRUCTURE.json").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("dict\\SEGMENT_STRUCTURE.json").is_err());
        assert!(validate_path("dict/SEGMENT_STRUCTURE.json").is_ok());
    }

    #[test]
    fn rejects_malformed_sha() {
        assert!(validate_sha("abc", "x.json").is_err());
        assert!(validate_sha(&"g".repeat(64), "x.json").is_err());
        assert!(validate_sha(&"a".repeat(64), "x.json").is_ok());
    }

    #[test]
    fn normalizes_current_dir_components() {
        assert_eq!(
            normalize_path(Path::new("./a/./b.json")),
            PathBuf::from("a/b.json")
        );
    }
}
