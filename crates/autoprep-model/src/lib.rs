//! Data model for the autoprep preprocessing engine.
//!
//! Plain serializable types shared by the ingest, engine, output and CLI
//! crates. Nothing here depends on a dataframe library.

pub mod diagnostics;
pub mod error;
pub mod mode;
pub mod options;
pub mod profile;

pub use diagnostics::{
    ColumnIssue, ColumnRename, Diagnostics, MissingCount, OutlierReport, QualityCheck,
    QualityReport,
};
pub use error::{OptionsError, Result};
pub use mode::{ProblemType, ProcessingMode, UnsupervisedReason};
pub use options::PrepOptions;
pub use profile::{ColumnKind, ColumnProfile, OutlierBounds};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_validate() {
        assert!(PrepOptions::default().validate().is_ok());
    }

    #[test]
    fn split_ratio_bounds_are_exclusive() {
        for ratio in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let options = PrepOptions::new().with_split_ratio(ratio);
            assert!(
                matches!(options.validate(), Err(OptionsError::SplitRatio(_))),
                "ratio {ratio} should be rejected"
            );
        }
        assert!(PrepOptions::new().with_split_ratio(0.5).validate().is_ok());
    }

    #[test]
    fn thresholds_are_checked() {
        let options = PrepOptions::new().with_id_unique_ratio(0.0);
        assert_eq!(
            options.validate(),
            Err(OptionsError::Threshold {
                name: "id_unique_ratio",
                value: 0.0
            })
        );
        let options = PrepOptions::new().with_iqr_multiplier(-1.0);
        assert_eq!(options.validate(), Err(OptionsError::IqrMultiplier(-1.0)));
    }

    #[test]
    fn outlier_bounds_from_quartiles() {
        let bounds = OutlierBounds::from_quartiles(2.0, 3.0, 1.5);
        assert_eq!(bounds.lower, 0.5);
        assert_eq!(bounds.upper, 4.5);
        assert!(bounds.is_outlier(100.0));
        assert!(!bounds.is_outlier(4.5));
        assert_eq!(bounds.clamp(100.0), 4.5);
        assert_eq!(bounds.clamp(-3.0), 0.5);
    }
}
