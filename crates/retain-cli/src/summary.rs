use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use retain_cli::pipeline::GenerationResult;
use retain_model::{Artifact, Diagnostic, Severity};

pub fn print_summary(result: &GenerationResult) {
    println!("Package: {}", result.options.package);
    println!("Passes: {}", result.run.passes);
    if result.written.is_empty() {
        println!("Output: {} (nothing written)", result.out_dir.display());
    } else {
        println!("Output: {}", result.out_dir.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Detail"),
        header_cell("Components"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for artifact in &result.run.artifacts {
        table.add_row(artifact_row(artifact));
    }
    println!("{table}");

    if !result.files.is_empty() {
        let mut files = Table::new();
        files.set_header(vec![header_cell("File"), header_cell("Lines")]);
        apply_table_style(&mut files);
        align_column(&mut files, 1, CellAlignment::Right);
        for file in &result.files {
            files.add_row(vec![
                Cell::new(file.relative_path().display()),
                Cell::new(file.contents.lines().count()),
            ]);
        }
        println!("{files}");
    }

    print_diagnostics(&result.run.diagnostics.diagnostics);
}

fn artifact_row(artifact: &Artifact) -> Vec<Cell> {
    match artifact {
        Artifact::Saver(plan) => vec![
            Cell::new("saver").fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(&plan.package),
            count_cell(plan.components.len(), Color::Green),
        ],
        Artifact::Runtime(plan) => vec![
            Cell::new("runtime").fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(&plan.package),
            dim_cell("-"),
        ],
        Artifact::DependencyMarker(plan) => vec![
            Cell::new("marker").fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(format!("{}.{}", plan.package, plan.marker.file_property)),
            count_cell(plan.marker.packages.len(), Color::Green),
        ],
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let mut ordered: Vec<&Diagnostic> = diagnostics.iter().collect();
    ordered.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.code.cmp(&b.code)));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Symbol"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Center);
    for diagnostic in ordered {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            Cell::new(&diagnostic.code),
            match &diagnostic.symbol {
                Some(symbol) => Cell::new(symbol),
                None => dim_cell("-"),
            },
            Cell::new(&diagnostic.message),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red).add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => dim_cell("INFO"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
