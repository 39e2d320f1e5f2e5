//! Configuration options for a preprocessing run.

use serde::{Deserialize, Serialize};

use crate::error::{OptionsError, Result};

pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_ID_UNIQUE_RATIO: f64 = 0.9;
pub const DEFAULT_NUMERIC_RATIO: f64 = 0.95;

/// Options controlling a preprocessing run.
///
/// The missing-value strategy is not configurable: numeric columns are
/// filled with the training median and categorical columns with the
/// training mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepOptions {
    /// Drop exact duplicate rows before profiling.
    pub remove_duplicates: bool,

    /// Clamp numeric values to the IQR bounds. When off, bounds are still
    /// fit and outliers are still counted.
    pub cap_outliers: bool,

    /// Share of labelled rows assigned to the training fold.
    pub split_ratio: f64,

    /// Seed for the train/test assignment.
    pub seed: u64,

    /// Split classification targets per class.
    pub stratify: bool,

    /// Multiplier applied to the IQR when deriving outlier bounds.
    pub iqr_multiplier: f64,

    /// Unique-value ratio above which a column counts as near-unique.
    pub id_unique_ratio: f64,

    /// Share of non-missing cells that must parse as numbers for a column
    /// to be profiled as numeric.
    pub numeric_ratio: f64,

    /// Exclude ID-like columns from the feature set.
    pub drop_id_like_features: bool,
}

impl Default for PrepOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            cap_outliers: true,
            split_ratio: DEFAULT_SPLIT_RATIO,
            seed: DEFAULT_SEED,
            stratify: true,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            id_unique_ratio: DEFAULT_ID_UNIQUE_RATIO,
            numeric_ratio: DEFAULT_NUMERIC_RATIO,
            drop_id_like_features: true,
        }
    }
}

impl PrepOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_remove_duplicates(mut self, enable: bool) -> Self {
        self.remove_duplicates = enable;
        self
    }

    #[must_use]
    pub fn with_cap_outliers(mut self, enable: bool) -> Self {
        self.cap_outliers = enable;
        self
    }

    #[must_use]
    pub fn with_split_ratio(mut self, ratio: f64) -> Self {
        self.split_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_stratify(mut self, enable: bool) -> Self {
        self.stratify = enable;
        self
    }

    #[must_use]
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_id_unique_ratio(mut self, ratio: f64) -> Self {
        self.id_unique_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_numeric_ratio(mut self, ratio: f64) -> Self {
        self.numeric_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_drop_id_like_features(mut self, enable: bool) -> Self {
        self.drop_id_like_features = enable;
        self
    }

    /// Share of labelled rows assigned to the test fold.
    pub fn test_share(&self) -> f64 {
        1.0 - self.split_ratio
    }

    /// Reject out-of-range settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.split_ratio > 0.0 && self.split_ratio < 1.0) {
            return Err(OptionsError::SplitRatio(self.split_ratio));
        }
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(OptionsError::IqrMultiplier(self.iqr_multiplier));
        }
        check_ratio("id_unique_ratio", self.id_unique_ratio)?;
        check_ratio("numeric_ratio", self.numeric_ratio)?;
        Ok(())
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(OptionsError::Threshold { name, value })
    }
}
