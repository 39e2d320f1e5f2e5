//! Tests for autoprep-model types.

use autoprep_model::{
    ColumnIssue, ColumnKind, ColumnProfile, Diagnostics, MissingCount, PrepOptions,
    ProcessingMode, QualityCheck, UnsupervisedReason,
};

fn profile(kind: ColumnKind, non_missing: usize, distinct: usize) -> ColumnProfile {
    ColumnProfile {
        name: "col".to_string(),
        kind,
        missing: 0,
        non_missing,
        distinct,
        numeric_ratio: 0.0,
        is_id_like: false,
    }
}

#[test]
fn unique_ratio_handles_empty_columns() {
    assert_eq!(profile(ColumnKind::Categorical, 0, 0).unique_ratio(), 0.0);
    assert!((profile(ColumnKind::Categorical, 4, 2).unique_ratio() - 0.5).abs() < 1e-12);
}

#[test]
fn cardinality_only_for_categorical() {
    assert_eq!(profile(ColumnKind::Categorical, 4, 3).cardinality(), Some(3));
    assert_eq!(profile(ColumnKind::Numeric, 4, 3).cardinality(), None);
}

#[test]
fn mode_serializes_lowercase() {
    let json = serde_json::to_string(&ProcessingMode::Unsupervised).expect("serialize mode");
    assert_eq!(json, "\"unsupervised\"");
}

#[test]
fn reason_serializes_with_tag() {
    let reason = UnsupervisedReason::TargetNotFound {
        target: "price".to_string(),
    };
    let json = serde_json::to_value(&reason).expect("serialize reason");
    assert_eq!(json["reason"], "target_not_found");
    assert_eq!(json["target"], "price");
    assert_eq!(reason.message(), "target column `price` not found");
}

#[test]
fn issue_accessors() {
    let issue = ColumnIssue::UnseenCategories {
        column: "city".to_string(),
        count: 2,
    };
    assert_eq!(issue.column(), "city");
    assert_eq!(issue.code(), "unseen_categories");
    assert!(issue.message().starts_with("2 value(s)"));
}

#[test]
fn diagnostics_totals_and_round_trip() {
    let mut diagnostics = Diagnostics::new(ProcessingMode::Supervised);
    diagnostics.missing = vec![
        MissingCount {
            column: "a".to_string(),
            before: 3,
            after: 0,
        },
        MissingCount {
            column: "b".to_string(),
            before: 2,
            after: 0,
        },
    ];
    diagnostics.issues.push(ColumnIssue::ZeroIqr {
        column: "a".to_string(),
    });
    assert_eq!(diagnostics.missing_before(), 5);
    assert_eq!(diagnostics.missing_after(), 0);
    assert_eq!(diagnostics.issues_for("a").count(), 1);
    assert_eq!(diagnostics.issues_for("b").count(), 0);

    let json = serde_json::to_string(&diagnostics).expect("serialize diagnostics");
    let round: Diagnostics = serde_json::from_str(&json).expect("deserialize diagnostics");
    assert_eq!(round, diagnostics);
}

#[test]
fn quality_points_sum_to_one_hundred() {
    let total: u32 = [
        QualityCheck::MissingValuesHandled,
        QualityCheck::OutliersReduced,
        QualityCheck::DuplicatesRemoved,
        QualityCheck::FeaturesEncodedAndScaled,
        QualityCheck::LeakageSafePipeline,
    ]
    .iter()
    .map(|check| u32::from(check.points()))
    .sum();
    assert_eq!(total, 100);
}

#[test]
fn options_deserialize_with_defaults() {
    let options: PrepOptions =
        serde_json::from_str(r#"{"seed": 7, "cap_outliers": false}"#).expect("parse options");
    assert_eq!(options.seed, 7);
    assert!(!options.cap_outliers);
    assert!(options.remove_duplicates);
    assert_eq!(options.split_ratio, 0.8);
}
