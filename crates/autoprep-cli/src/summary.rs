use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use autoprep_core::TargetDecision;
use autoprep_model::{
    ColumnIssue, ColumnKind, ColumnProfile, Diagnostics, ProblemType, ProcessingMode, QualityCheck,
};

use crate::types::{ProfileResult, RunResult};

pub fn print_run_summary(result: &RunResult) {
    for line in overview_lines(result) {
        println!("{line}");
    }
    println!("{}", column_table(&result.diagnostics));
    print_quality(&result.diagnostics);
    print_issues(&result.diagnostics);
}

/// Plain-text header lines of the run summary.
pub fn overview_lines(result: &RunResult) -> Vec<String> {
    let d = &result.diagnostics;
    let mut lines = vec![format!("Input: {}", result.input.display())];
    lines.push(match (d.mode, &d.unsupervised_reason) {
        (ProcessingMode::Unsupervised, Some(reason)) => format!("Mode: unsupervised ({reason})"),
        (ProcessingMode::Unsupervised, None) => "Mode: unsupervised".to_string(),
        (ProcessingMode::Supervised, _) => format!(
            "Mode: supervised ({} on `{}`)",
            d.problem_type.as_ref().map_or("-", ProblemType::as_str),
            d.target.as_deref().unwrap_or("-"),
        ),
    });
    if !d.class_labels.is_empty() {
        lines.push(format!("Classes: {}", d.class_labels.join(", ")));
    }
    lines.push(format!(
        "Rows: {} raw, {} duplicates removed, {} unlabelled dropped",
        d.raw_rows, d.duplicates_removed, d.unlabelled_rows_dropped
    ));
    lines.push(match d.mode {
        ProcessingMode::Supervised => format!("Split: {} train / {} test", d.train_rows, d.test_rows),
        ProcessingMode::Unsupervised => format!("Split: {} train (no test fold)", d.train_rows),
    });
    lines.push(format!(
        "Features: {} raw -> {} processed",
        d.raw_features, d.processed_features
    ));
    lines.push(format!(
        "Missing values: {} -> {}",
        d.missing_before(),
        d.missing_after()
    ));
    lines.push(format!(
        "Outliers: {} -> {}",
        d.outliers_before, d.outliers_after
    ));
    lines.push(format!("Quality score: {} / 100", d.quality.score));
    if result.dry_run {
        lines.push("Dry run: no files written".to_string());
    } else {
        lines.push(format!("Output: {}", result.output_dir.display()));
    }
    lines
}

fn column_table(d: &Diagnostics) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Missing"),
        header_cell("Outliers"),
        header_cell("Notes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for profile in &d.profiles {
        let missing = d
            .missing
            .iter()
            .find(|entry| entry.column == profile.name)
            .map(|entry| format!("{} -> {}", entry.before, entry.after))
            .unwrap_or_else(|| "-".to_string());
        let outliers = d
            .outliers
            .iter()
            .find(|entry| entry.column == profile.name)
            .map(|entry| format!("{} -> {}", entry.before, entry.after))
            .unwrap_or_else(|| "-".to_string());
        let mut notes: Vec<&str> = d
            .issues_for(&profile.name)
            .map(ColumnIssue::code)
            .collect();
        if d.target.as_deref() == Some(profile.name.as_str()) {
            notes.insert(0, "target");
        }
        table.add_row(vec![
            name_cell(&profile.name),
            kind_cell(profile.kind),
            Cell::new(missing),
            Cell::new(outliers),
            notes_cell(&notes),
        ]);
    }
    table
}

fn print_quality(d: &Diagnostics) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Points")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for check in &d.quality.checks {
        table.add_row(vec![check_cell(*check), Cell::new(check.points())]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(d.quality.score).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("Quality:");
    println!("{table}");
}

fn print_issues(d: &Diagnostics) {
    if d.issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Code"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for issue in &d.issues {
        table.add_row(vec![
            name_cell(issue.column()),
            Cell::new(issue.code()).fg(Color::Yellow),
            Cell::new(issue.message()),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn print_profile(result: &ProfileResult) {
    println!("Input: {}", result.input.display());
    println!(
        "Rows: {} ({} duplicates removed)",
        result.profile.rows, result.profile.duplicates_removed
    );
    println!("{}", decision_line(&result.profile.decision));
    println!("{}", profile_table(&result.profile.profiles));
}

pub fn decision_line(decision: &TargetDecision) -> String {
    match decision {
        TargetDecision::Supervised { target, problem } => {
            format!("Mode: supervised ({problem} on `{target}`)")
        }
        TargetDecision::Unsupervised { reason } => format!("Mode: unsupervised ({reason})"),
    }
}

fn profile_table(profiles: &[ColumnProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Missing"),
        header_cell("Distinct"),
        header_cell("Numeric %"),
        header_cell("ID-like"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 5, CellAlignment::Center);
    for profile in profiles {
        table.add_row(vec![
            name_cell(&profile.name),
            kind_cell(profile.kind),
            count_cell(profile.missing, Color::Yellow),
            Cell::new(profile.distinct),
            Cell::new(format!("{:.1}", profile.numeric_ratio * 100.0)),
            if profile.is_id_like {
                Cell::new("yes").fg(Color::Red).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    table
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn kind_cell(kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Numeric => Cell::new(kind.as_str()).fg(Color::Green),
        ColumnKind::Categorical => Cell::new(kind.as_str()).fg(Color::Magenta),
    }
}

fn check_cell(check: QualityCheck) -> Cell {
    Cell::new(format!("✓ {}", check.label())).fg(Color::Green)
}

fn notes_cell(notes: &[&str]) -> Cell {
    if notes.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(notes.join(", "))
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
