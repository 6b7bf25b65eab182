use std::path::PathBuf;

use ssmix_model::Category;

#[derive(Debug)]
pub struct RunResult {
    pub files: Vec<FileSummary>,
    pub output: Option<PathBuf>,
    pub has_errors: bool,
}

/// Outcome of one message file.
#[derive(Debug)]
pub struct FileSummary {
    pub path: PathBuf,
    pub category: Option<Category>,
    pub segments: usize,
    pub diagnostics: usize,
    pub error: Option<String>,
}
