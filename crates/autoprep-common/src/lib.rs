//! Shared utilities for autoprep crates.
//!
//! This crate provides common helpers used across the autoprep workspace,
//! including Polars value conversions and missing-value recognition.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    MISSING_MARKERS, any_to_string, cell_text, column_cells, format_numeric,
    is_missing_marker, parse_f64,
};
