use autoprep_model::{QualityCheck, QualityReport};

/// Inputs to the 0-100 data quality score.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityInputs {
    /// Missing feature cells left by cleaning, before the imputer runs.
    pub feature_cells_missing: usize,
    pub outliers_before: usize,
    pub outliers_after: usize,
    pub duplicates_removed: usize,
    pub raw_features: usize,
    pub processed_features: usize,
}

pub fn score(inputs: &QualityInputs) -> QualityReport {
    let mut checks = Vec::new();
    if inputs.feature_cells_missing == 0 {
        checks.push(QualityCheck::MissingValuesHandled);
    }
    if inputs.outliers_after < inputs.outliers_before {
        checks.push(QualityCheck::OutliersReduced);
    }
    if inputs.duplicates_removed > 0 {
        checks.push(QualityCheck::DuplicatesRemoved);
    }
    if inputs.processed_features >= inputs.raw_features {
        checks.push(QualityCheck::FeaturesEncodedAndScaled);
    }
    // Fit/apply separation holds for every run.
    checks.push(QualityCheck::LeakageSafePipeline);
    let total: u32 = checks.iter().map(|check| u32::from(check.points())).sum();
    QualityReport {
        score: total.min(100) as u8,
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_marks() {
        let report = score(&QualityInputs {
            feature_cells_missing: 0,
            outliers_before: 3,
            outliers_after: 0,
            duplicates_removed: 2,
            raw_features: 4,
            processed_features: 9,
        });
        assert_eq!(report.score, 100);
        assert_eq!(report.checks.len(), 5);
    }

    #[test]
    fn leakage_check_always_passes() {
        let report = score(&QualityInputs {
            feature_cells_missing: 1,
            raw_features: 5,
            processed_features: 2,
            ..QualityInputs::default()
        });
        assert_eq!(report.score, 10);
        assert_eq!(report.checks, vec![QualityCheck::LeakageSafePipeline]);
    }
}
