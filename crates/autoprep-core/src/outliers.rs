//! IQR outlier bounds, counting and capping.
//!
//! Bounds come from the training fold only. Capping clamps values to the
//! bounds and never removes rows.

use polars::prelude::{ChunkApply, ChunkQuantile, DataFrame, IntoColumn, QuantileMethod};
use tracing::debug;

use autoprep_model::{ColumnIssue, ColumnKind, OutlierBounds};

use crate::error::Result;
use crate::fold::FoldTransform;
use crate::frame::{column_kind, f64_chunked};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBounds {
    pub column: String,
    /// `None` for columns with a zero IQR, which are never capped.
    pub bounds: Option<OutlierBounds>,
}

/// Per-column bounds fit on the training fold.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCapper {
    pub columns: Vec<ColumnBounds>,
    /// When false, `apply` passes folds through untouched.
    pub enabled: bool,
}

impl FittedCapper {
    /// Fit bounds for every numeric column of `train`.
    pub fn fit(train: &DataFrame, multiplier: f64, enabled: bool) -> Result<(Self, Vec<ColumnIssue>)> {
        let mut columns = Vec::new();
        let mut issues = Vec::new();
        for column in train.get_columns() {
            if column_kind(column)? != ColumnKind::Numeric {
                continue;
            }
            let name = column.name().to_string();
            let values = f64_chunked(train, &name)?;
            let bounds = match (
                values.quantile(0.25, QuantileMethod::Linear)?,
                values.quantile(0.75, QuantileMethod::Linear)?,
            ) {
                (Some(q1), Some(q3)) if q3 - q1 > 0.0 => {
                    Some(OutlierBounds::from_quartiles(q1, q3, multiplier))
                }
                _ => {
                    issues.push(ColumnIssue::ZeroIqr {
                        column: name.clone(),
                    });
                    None
                }
            };
            debug!(column = %name, bounds = ?bounds, "outlier bounds fitted");
            columns.push(ColumnBounds {
                column: name,
                bounds,
            });
        }
        Ok((Self { columns, enabled }, issues))
    }

    pub fn bounds_for(&self, column: &str) -> Option<&OutlierBounds> {
        self.columns
            .iter()
            .find(|entry| entry.column == column)
            .and_then(|entry| entry.bounds.as_ref())
    }

    /// Values outside the fitted bounds, per fitted column, in fit order.
    pub fn count_outliers(&self, fold: &DataFrame) -> Result<Vec<usize>> {
        let mut counts = Vec::with_capacity(self.columns.len());
        for entry in &self.columns {
            let count = match &entry.bounds {
                Some(bounds) => f64_chunked(fold, &entry.column)?
                    .into_iter()
                    .flatten()
                    .filter(|value| bounds.is_outlier(*value))
                    .count(),
                None => 0,
            };
            counts.push(count);
        }
        Ok(counts)
    }
}

impl FoldTransform for FittedCapper {
    fn stage(&self) -> &'static str {
        "outliers"
    }

    fn apply(&self, fold: &DataFrame) -> Result<DataFrame> {
        let mut out = fold.clone();
        if !self.enabled {
            return Ok(out);
        }
        for entry in &self.columns {
            let Some(bounds) = &entry.bounds else {
                continue;
            };
            let capped = f64_chunked(fold, &entry.column)?.apply_values(|v| bounds.clamp(v));
            out.with_column(capped.into_column())?;
        }
        Ok(out)
    }
}
