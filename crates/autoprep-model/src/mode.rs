//! Supervised/unsupervised routing decided by the target validator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the run treats the dataset. Decided once, before splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Supervised,
    Unsupervised,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Supervised => "supervised",
            ProcessingMode::Unsupervised => "unsupervised",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning task implied by a valid target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    /// Numeric target.
    Regression,
    /// Categorical target.
    Classification,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Regression => "regression",
            ProblemType::Classification => "classification",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run fell back to unsupervised handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnsupervisedReason {
    /// No target column was nominated.
    NoTarget,
    /// The nominated column is not in the dataset.
    TargetNotFound { target: String },
    /// The nominated column is (near-)unique per row.
    IdLikeTarget { target: String },
    /// The nominated column has no values at all.
    AllMissingTarget { target: String },
    /// The nominated column holds a single distinct value.
    SingleValuedTarget { target: String },
}

impl UnsupervisedReason {
    pub fn message(&self) -> String {
        match self {
            UnsupervisedReason::NoTarget => "no target column nominated".to_string(),
            UnsupervisedReason::TargetNotFound { target } => {
                format!("target column `{target}` not found")
            }
            UnsupervisedReason::IdLikeTarget { target } => {
                format!("target column `{target}` is ID-like")
            }
            UnsupervisedReason::AllMissingTarget { target } => {
                format!("target column `{target}` is entirely missing")
            }
            UnsupervisedReason::SingleValuedTarget { target } => {
                format!("target column `{target}` has a single distinct value")
            }
        }
    }
}

impl fmt::Display for UnsupervisedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
