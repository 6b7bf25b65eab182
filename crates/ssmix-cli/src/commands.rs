use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use serde::Serialize;
use tracing::{debug, info, info_span};

use ssmix_assemble::{Document, GroupKind, Jsonizer, grammar_for};
use ssmix_cli::config::ConfigFile;
use ssmix_ingest::{ReadOptions, discover_messages, infer_category, read_message};
use ssmix_model::{Category, Diagnostic, JsonizerOptions, SchemaTables};
use ssmix_standards::{DoctorReport, StandardsRegistry, load_unverified};

use crate::cli::JsonizeArgs;
use crate::summary::apply_table_style;
use crate::types::{FileSummary, RunResult};

/// One NDJSON line in `--with-diagnostics` mode.
#[derive(Serialize)]
struct Record<'a> {
    file: String,
    category: Category,
    document: &'a Document,
    diagnostics: &'a [Diagnostic],
}

pub fn run_categories() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Usage table", "Groups"]);
    apply_table_style(&mut table);
    for category in Category::ALL {
        let groups: Vec<&str> = grammar_for(category)
            .group_kinds()
            .iter()
            .map(GroupKind::as_str)
            .collect();
        let groups = if groups.is_empty() {
            "-".to_string()
        } else {
            groups.join(", ")
        };
        table.add_row(vec![
            category.as_str().to_string(),
            category.usage_key().to_string(),
            groups,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_standards(standards_dir: &Path) -> Result<()> {
    let (registry, summary) = StandardsRegistry::verify_and_load(standards_dir)
        .with_context(|| format!("verify standards in {}", standards_dir.display()))?;
    info!(
        files = summary.file_count,
        segments = summary.segment_count,
        data_types = summary.data_type_count,
        "standards verified"
    );
    let report = DoctorReport::from_verify_summary(&summary, registry.files);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize doctor report")?
    );
    Ok(())
}

pub fn run_jsonize(args: &JsonizeArgs, standards_dir: &Path) -> Result<RunResult> {
    let _run = info_span!("jsonize_run").entered();

    let config = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let options = apply_overrides(args, config.jsonizer);
    let read_options = match &args.encoding {
        Some(label) => config.read.with_encoding(label.clone()),
        None => config.read,
    };
    read_options
        .resolve_encoding()
        .context("resolve message encoding")?;
    let category = args.category.or(options.category);

    let schema = load_schema(standards_dir, args.unverified_standards)?;
    let jsonizer = Jsonizer::new(schema, options);
    let inputs = collect_inputs(&args.paths)?;
    info!(files = inputs.len(), "jsonizing messages");

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut files = Vec::with_capacity(inputs.len());
    for path in &inputs {
        files.push(jsonize_file(
            &jsonizer,
            path,
            category,
            &read_options,
            args.with_diagnostics,
            out.as_mut(),
        )?);
    }
    out.flush().context("flush output")?;

    let failed = files.iter().filter(|file| file.error.is_some()).count();
    info!(files = files.len(), failed, "run complete");
    Ok(RunResult {
        files,
        output: args.output.clone(),
        has_errors: failed > 0,
    })
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(args: &JsonizeArgs, mut options: JsonizerOptions) -> JsonizerOptions {
    if args.keep_identifiers {
        options.deidentify = false;
    }
    if args.no_usage_filter {
        options.strict_usage_filtering = false;
    }
    if let Some(prefix) = &args.nest_prefix {
        options.nesting.prefix = prefix.clone();
    }
    if let Some(suffix) = &args.nest_suffix {
        options.nesting.suffix = suffix.clone();
    }
    if let Some(language) = args.field_lang {
        options.field_names.language = language.into();
    }
    if let Some(language) = args.element_lang {
        options.element_names.language = language.into();
    }
    if args.plain_names {
        options.field_names.sequence_prefixed = false;
        options.element_names.sequence_prefixed = false;
    }
    options
}

fn load_schema(standards_dir: &Path, unverified: bool) -> Result<SchemaTables> {
    if unverified {
        return load_unverified(standards_dir)
            .with_context(|| format!("load standards from {}", standards_dir.display()));
    }
    let (registry, summary) = StandardsRegistry::verify_and_load(standards_dir)
        .with_context(|| format!("verify standards in {}", standards_dir.display()))?;
    debug!(
        segments = summary.segment_count,
        data_types = summary.data_type_count,
        "standards loaded"
    );
    Ok(registry.schema)
}

/// Expand directories into the message files below them.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = discover_messages(path)
                .with_context(|| format!("scan {}", path.display()))?;
            inputs.extend(found);
        } else if path.is_file() {
            inputs.push(path.clone());
        } else {
            bail!("no such file or directory: {}", path.display());
        }
    }
    Ok(inputs)
}

/// Jsonize one file and write its line. Per-file failures are recorded in the
/// summary; only output errors abort the run.
fn jsonize_file(
    jsonizer: &Jsonizer,
    path: &Path,
    category: Option<Category>,
    read_options: &ReadOptions,
    with_diagnostics: bool,
    out: &mut dyn Write,
) -> Result<FileSummary> {
    let mut summary = FileSummary {
        path: path.to_path_buf(),
        category: category.or_else(|| infer_category(path)),
        segments: 0,
        diagnostics: 0,
        error: None,
    };
    let Some(category) = summary.category else {
        tracing::error!(path = %path.display(), "cannot infer data category; pass --category");
        summary.error = Some("unknown data category".to_string());
        return Ok(summary);
    };

    let text = match read_message(path, read_options) {
        Ok(text) => text,
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "message not readable");
            summary.error = Some(error.to_string());
            return Ok(summary);
        }
    };
    let result = match jsonizer.jsonize_category(category, &text) {
        Ok(result) => result,
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "message not decodable");
            summary.error = Some(error.to_string());
            return Ok(summary);
        }
    };

    summary.segments = result.document.segment_count();
    summary.diagnostics = result.diagnostics.len();
    let written = if with_diagnostics {
        let record = Record {
            file: path.display().to_string(),
            category,
            document: &result.document,
            diagnostics: &result.diagnostics,
        };
        serde_json::to_writer(&mut *out, &record)
    } else {
        serde_json::to_writer(&mut *out, &result.document)
    };
    written.context("write output")?;
    writeln!(out).context("write output")?;

    debug!(
        path = %path.display(),
        %category,
        segments = summary.segments,
        diagnostics = summary.diagnostics,
        "message jsonized"
    );
    Ok(summary)
}
