//! Per-column profiling results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inferred storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of a single column, computed once per dataset load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name after normalization.
    pub name: String,
    /// Inferred kind.
    pub kind: ColumnKind,
    /// Number of missing cells.
    pub missing: usize,
    /// Number of non-missing cells.
    pub non_missing: usize,
    /// Number of distinct non-missing values.
    pub distinct: usize,
    /// Share of non-missing cells that parse as numbers.
    pub numeric_ratio: f64,
    /// Near-unique column whose name looks like an identifier, or a near-unique target.
    pub is_id_like: bool,
}

impl ColumnProfile {
    /// Distinct non-missing values divided by non-missing cells.
    pub fn unique_ratio(&self) -> f64 {
        if self.non_missing == 0 {
            0.0
        } else {
            self.distinct as f64 / self.non_missing as f64
        }
    }

    /// Cardinality, reported for categorical columns only.
    pub fn cardinality(&self) -> Option<usize> {
        match self.kind {
            ColumnKind::Categorical => Some(self.distinct),
            ColumnKind::Numeric => None,
        }
    }

    pub fn is_all_missing(&self) -> bool {
        self.non_missing == 0
    }
}

/// Interquartile-range bounds for one numeric column, fit on the training fold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Build bounds as `[q1 - k*iqr, q3 + k*iqr]`.
    pub fn from_quartiles(q1: f64, q3: f64, multiplier: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}
