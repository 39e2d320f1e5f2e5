use polars::prelude::PolarsError;
use thiserror::Error;

use autoprep_model::OptionsError;

/// Dataset-level failures that abort a run. Column-level conditions are
/// recorded as [`autoprep_model::ColumnIssue`] instead.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("dataset has no rows")]
    EmptyDataset,
    #[error("dataset has no columns")]
    NoColumns,
    #[error("no usable feature columns remain")]
    NoFeatures,
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
    #[error("column `{column}` has unsupported type {dtype}")]
    UnsupportedColumn { column: String, dtype: String },
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, PrepError>;
