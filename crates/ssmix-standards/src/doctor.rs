#![deny(unsafe_code)]

use crate::manifest::{ManifestFile, Pins};
use crate::registry::VerifySummary;

/// Machine-readable health report of a standards directory.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
    pub counts: DoctorCounts,
    pub usage_categories: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorCounts {
    pub files: usize,
    pub segments: usize,
    pub data_types: usize,
    pub usage_categories: usize,
}

impl DoctorReport {
    pub fn from_verify_summary(summary: &VerifySummary, files: Vec<ManifestFile>) -> Self {
        Self {
            schema: "ssmix-jsonizer.standards-doctor".to_string(),
            schema_version: 1,
            pins: summary.manifest_pins.clone(),
            files,
            counts: DoctorCounts {
                files: summary.file_count,
                segments: summary.segment_count,
                data_types: summary.data_type_count,
                usage_categories: summary.usage_categories.len(),
            },
            usage_categories: summary.usage_categories.clone(),
        }
    }
}
