use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use autoprep_common::is_missing_marker;

/// Raw CSV contents with a single header row.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Convert into a DataFrame of nullable string columns.
    ///
    /// Missing markers become nulls; typing happens later during profiling.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.headers.len());
        for (col_idx, header) in self.headers.iter().enumerate() {
            let values: Vec<Option<String>> = self
                .rows
                .iter()
                .map(|row| {
                    let cell = row.get(col_idx).map(String::as_str).unwrap_or("");
                    if is_missing_marker(cell) {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            columns.push(Series::new(header.as_str().into(), values).into_column());
        }
        DataFrame::new(columns).context("build frame from csv table")
    }
}

fn clean_text(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Give blank and repeated headers distinct names so every column survives.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, header) in raw.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("unnamed_{idx}")
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 1usize;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = std::fs::File::open(path).with_context(|| format!("read csv: {}", path.display()))?;
    read_csv_table_from_reader(file).with_context(|| format!("read csv: {}", path.display()))
}

/// Read CSV from any reader. The first non-blank record is the header row;
/// blank records before it are skipped. Later records are kept even when
/// every cell is empty, and short records are padded.
pub fn read_csv_table_from_reader<R: Read>(reader: R) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read record {}", idx + 1))?;
        let cells: Vec<String> = record.iter().map(clean_text).collect();
        if let Some(headers) = &headers {
            rows.push(
                (0..headers.len())
                    .map(|idx| cells.get(idx).cloned().unwrap_or_default())
                    .collect(),
            );
        } else if !cells.iter().all(String::is_empty) {
            headers = Some(dedupe_headers(cells));
        }
    }
    let headers = headers.unwrap_or_default();
    debug!(columns = headers.len(), rows = rows.len(), "csv table read");
    Ok(CsvTable { headers, rows })
}

/// Read a CSV file straight into a string-typed DataFrame.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    read_csv_table(path)?.to_frame()
}
