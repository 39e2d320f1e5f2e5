//! Duplicate-row removal and column-name normalization.

use std::collections::{BTreeSet, HashSet};

use polars::prelude::DataFrame;
use tracing::debug;

use autoprep_common::column_cells;
use autoprep_model::ColumnRename;

use crate::error::Result;
use crate::frame::filter_rows;

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '_' | '-' | '.' | '/' | '\\' | ':' | '|')
}

/// Normalize a single column name.
///
/// Trims, lowercases, turns separator runs into a single underscore and
/// drops anything that is not an ASCII letter or digit. Already-normalized
/// names come back unchanged.
pub fn normalize_column_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch.to_ascii_lowercase());
        } else if is_separator(ch) {
            pending_separator = true;
        }
    }
    out
}

/// Normalize every column name of `df`.
///
/// Blank results become `column_<n>` and collisions get a numeric suffix so
/// the frame keeps one column per source column.
pub fn normalize_column_names(df: &DataFrame) -> Result<(DataFrame, Vec<ColumnRename>)> {
    let mut taken = BTreeSet::new();
    let mut renames = Vec::new();
    let mut columns = Vec::with_capacity(df.width());
    for (idx, column) in df.get_columns().iter().enumerate() {
        let original = column.name().to_string();
        let mut base = normalize_column_name(&original);
        if base.is_empty() {
            base = format!("column_{}", idx + 1);
        }
        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while !taken.insert(candidate.clone()) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        if candidate != original {
            renames.push(ColumnRename {
                from: original,
                to: candidate.clone(),
            });
        }
        columns.push(column.clone().with_name(candidate.into()));
    }
    Ok((DataFrame::new(columns)?, renames))
}

/// Remove exact duplicate rows, keeping the first occurrence.
///
/// Returns the deduplicated frame and the number of rows removed.
pub fn remove_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let height = df.height();
    if height == 0 {
        return Ok((df.clone(), 0));
    }
    let cells: Vec<Vec<Option<String>>> = df.get_columns().iter().map(column_cells).collect();
    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(height);
    let mut keep = Vec::with_capacity(height);
    for idx in 0..height {
        let key: Vec<Option<&str>> = cells.iter().map(|col| col[idx].as_deref()).collect();
        keep.push(seen.insert(key));
    }
    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }
    debug!(removed, "duplicate rows removed");
    Ok((filter_rows(df, &keep)?, removed))
}
