//! Diagnostics bundle returned alongside the processed artifacts.

use serde::{Deserialize, Serialize};

use crate::mode::{ProblemType, ProcessingMode, UnsupervisedReason};
use crate::profile::{ColumnProfile, OutlierBounds};

/// A column-level condition that was handled locally instead of failing the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnIssue {
    /// No non-missing training values; the column was dropped.
    AllMissingColumn { column: String },
    /// Zero interquartile range; outlier capping skipped.
    ZeroIqr { column: String },
    /// Zero training variance; values centered without scaling.
    ZeroVariance { column: String },
    /// Categories absent from the training vocabulary, encoded as all zeros.
    UnseenCategories { column: String, count: usize },
    /// Non-numeric cells in a numeric column read as missing.
    CoercedToMissing { column: String, count: usize },
    /// ID-like column excluded from the feature set.
    IdLikeFeatureDropped { column: String },
}

impl ColumnIssue {
    pub fn column(&self) -> &str {
        match self {
            ColumnIssue::AllMissingColumn { column }
            | ColumnIssue::ZeroIqr { column }
            | ColumnIssue::ZeroVariance { column }
            | ColumnIssue::UnseenCategories { column, .. }
            | ColumnIssue::CoercedToMissing { column, .. }
            | ColumnIssue::IdLikeFeatureDropped { column } => column,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ColumnIssue::AllMissingColumn { .. } => "all_missing_column",
            ColumnIssue::ZeroIqr { .. } => "zero_iqr",
            ColumnIssue::ZeroVariance { .. } => "zero_variance",
            ColumnIssue::UnseenCategories { .. } => "unseen_categories",
            ColumnIssue::CoercedToMissing { .. } => "coerced_to_missing",
            ColumnIssue::IdLikeFeatureDropped { .. } => "id_like_feature_dropped",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ColumnIssue::AllMissingColumn { .. } => {
                "no training values; column dropped".to_string()
            }
            ColumnIssue::ZeroIqr { .. } => "zero IQR; outlier capping skipped".to_string(),
            ColumnIssue::ZeroVariance { .. } => {
                "zero variance; centered without scaling".to_string()
            }
            ColumnIssue::UnseenCategories { count, .. } => {
                format!("{count} value(s) outside the training vocabulary encoded as all zeros")
            }
            ColumnIssue::CoercedToMissing { count, .. } => {
                format!("{count} non-numeric value(s) read as missing")
            }
            ColumnIssue::IdLikeFeatureDropped { .. } => {
                "ID-like column excluded from features".to_string()
            }
        }
    }
}

/// Missing-cell counts for one source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    /// Missing cells in the loaded dataset.
    pub before: usize,
    /// Missing cells left across all folds after imputation.
    pub after: usize,
}

/// Outlier counts for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    /// `None` when the column was skipped for a zero IQR.
    pub bounds: Option<OutlierBounds>,
    pub before: usize,
    pub after: usize,
}

/// A passed data-quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCheck {
    MissingValuesHandled,
    OutliersReduced,
    DuplicatesRemoved,
    FeaturesEncodedAndScaled,
    LeakageSafePipeline,
}

impl QualityCheck {
    pub fn points(&self) -> u8 {
        match self {
            QualityCheck::MissingValuesHandled => 30,
            QualityCheck::OutliersReduced => 25,
            QualityCheck::DuplicatesRemoved => 15,
            QualityCheck::FeaturesEncodedAndScaled => 20,
            QualityCheck::LeakageSafePipeline => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityCheck::MissingValuesHandled => "Missing values handled",
            QualityCheck::OutliersReduced => "Outliers reduced",
            QualityCheck::DuplicatesRemoved => "Duplicates removed",
            QualityCheck::FeaturesEncodedAndScaled => "Features encoded & scaled",
            QualityCheck::LeakageSafePipeline => "Leakage-safe pipeline",
        }
    }
}

/// Overall 0-100 quality score with the checks that passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: u8,
    pub checks: Vec<QualityCheck>,
}

/// A column renamed by name normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// Everything the presentation layer needs to report on a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub mode: ProcessingMode,
    pub unsupervised_reason: Option<UnsupervisedReason>,
    pub target: Option<String>,
    pub problem_type: Option<ProblemType>,
    /// Sorted label vocabulary for classification targets.
    pub class_labels: Vec<String>,
    pub renamed_columns: Vec<ColumnRename>,
    pub profiles: Vec<ColumnProfile>,
    pub raw_rows: usize,
    pub raw_features: usize,
    pub duplicates_removed: usize,
    pub unlabelled_rows_dropped: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub missing: Vec<MissingCount>,
    /// Missing feature cells across both folds just before imputation.
    pub feature_cells_missing: usize,
    pub outliers: Vec<OutlierReport>,
    pub outliers_before: usize,
    pub outliers_after: usize,
    pub feature_names: Vec<String>,
    pub processed_features: usize,
    pub issues: Vec<ColumnIssue>,
    pub quality: QualityReport,
}

impl Diagnostics {
    /// Empty bundle for the given mode; the pipeline fills it stage by stage.
    pub fn new(mode: ProcessingMode) -> Self {
        Self {
            mode,
            unsupervised_reason: None,
            target: None,
            problem_type: None,
            class_labels: Vec::new(),
            renamed_columns: Vec::new(),
            profiles: Vec::new(),
            raw_rows: 0,
            raw_features: 0,
            duplicates_removed: 0,
            unlabelled_rows_dropped: 0,
            train_rows: 0,
            test_rows: 0,
            missing: Vec::new(),
            feature_cells_missing: 0,
            outliers: Vec::new(),
            outliers_before: 0,
            outliers_after: 0,
            feature_names: Vec::new(),
            processed_features: 0,
            issues: Vec::new(),
            quality: QualityReport::default(),
        }
    }

    pub fn missing_before(&self) -> usize {
        self.missing.iter().map(|entry| entry.before).sum()
    }

    pub fn missing_after(&self) -> usize {
        self.missing.iter().map(|entry| entry.after).sum()
    }

    pub fn issues_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a ColumnIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.column() == column)
    }
}
