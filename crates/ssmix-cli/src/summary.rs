use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use crate::types::{FileSummary, RunResult};

/// Print the per-file summary to stderr; stdout carries the NDJSON output.
pub fn print_summary(result: &RunResult) {
    if let Some(path) = &result.output {
        eprintln!("Output: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Category"),
        header_cell("Segments"),
        header_cell("Diagnostics"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);

    let mut total_segments = 0usize;
    let mut total_diagnostics = 0usize;
    let mut failed = 0usize;
    for file in &result.files {
        total_segments += file.segments;
        total_diagnostics += file.diagnostics;
        if file.error.is_some() {
            failed += 1;
        }
        table.add_row(vec![
            file_cell(file),
            category_cell(file),
            Cell::new(file.segments),
            count_cell(file.diagnostics, Color::Yellow),
            status_cell(file),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} files", result.files.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_segments).add_attribute(Attribute::Bold),
        count_cell(total_diagnostics, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(failed, Color::Red).add_attribute(Attribute::Bold),
    ]);
    eprintln!("{table}");

    let errors: Vec<&FileSummary> = result
        .files
        .iter()
        .filter(|file| file.error.is_some())
        .collect();
    if !errors.is_empty() {
        eprintln!("Errors:");
        for file in errors {
            if let Some(error) = &file.error {
                eprintln!("- {}: {error}", file.path.display());
            }
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn file_cell(file: &FileSummary) -> Cell {
    let name = file
        .path
        .file_name()
        .map_or_else(|| file.path.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        });
    Cell::new(name)
}

fn category_cell(file: &FileSummary) -> Cell {
    match file.category {
        Some(category) => Cell::new(category)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        None => dim_cell("?"),
    }
}

fn status_cell(file: &FileSummary) -> Cell {
    match file.error {
        Some(_) => Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
