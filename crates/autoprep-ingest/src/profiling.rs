//! Column type inference.
//!
//! Each column is classified as numeric or categorical from the share of its
//! non-missing cells that parse as numbers, and flagged ID-like when it is
//! near-unique and either carries an identifier-style name or is the
//! nominated target.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tracing::debug;

use autoprep_common::{column_cells, parse_f64};
use autoprep_model::{ColumnKind, ColumnProfile, PrepOptions};

const IDENTIFIER_NAMES: &[&str] = &[
    "id", "idx", "index", "key", "uuid", "guid", "row_id", "rowid", "record_id",
];
const IDENTIFIER_SUFFIXES: &[&str] = &["_id", "_uuid", "_guid", "_key"];

/// Returns true for identifier-style column names (`id`, `customer_id`, `row_uuid`, ...).
pub fn is_identifier_name(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    IDENTIFIER_NAMES.contains(&lower.as_str())
        || IDENTIFIER_SUFFIXES
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        || lower.starts_with("id_")
}

/// Profile every column of `df` in column order.
pub fn build_column_profiles(
    df: &DataFrame,
    target: Option<&str>,
    options: &PrepOptions,
) -> Vec<ColumnProfile> {
    df.get_columns()
        .iter()
        .map(|column| {
            let name = column.name().to_string();
            let is_target = target.is_some_and(|t| t == name);
            profile_cells(name, &column_cells(column), is_target, options)
        })
        .collect()
}

fn profile_cells(
    name: String,
    cells: &[Option<String>],
    is_target: bool,
    options: &PrepOptions,
) -> ColumnProfile {
    let mut non_missing = 0usize;
    let mut numeric = 0usize;
    let mut uniques: HashSet<&str> = HashSet::new();
    for value in cells.iter().flatten() {
        non_missing += 1;
        uniques.insert(value.as_str());
        if parse_f64(value).is_some() {
            numeric += 1;
        }
    }
    let missing = cells.len() - non_missing;
    let numeric_ratio = if non_missing == 0 {
        0.0
    } else {
        numeric as f64 / non_missing as f64
    };
    // All-missing columns default to categorical.
    let kind = if non_missing > 0 && numeric_ratio >= options.numeric_ratio {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    };
    let mut profile = ColumnProfile {
        name,
        kind,
        missing,
        non_missing,
        distinct: uniques.len(),
        numeric_ratio,
        is_id_like: false,
    };
    let near_unique = !profile.is_all_missing()
        && (profile.distinct == profile.non_missing
            || profile.unique_ratio() > options.id_unique_ratio);
    profile.is_id_like = near_unique && (is_target || is_identifier_name(&profile.name));
    debug!(
        column = %profile.name,
        kind = %profile.kind,
        missing,
        distinct = profile.distinct,
        is_id_like = profile.is_id_like,
        "column profiled"
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some((*v).to_string())
                }
            })
            .collect()
    }

    #[test]
    fn identifier_names() {
        for name in ["id", "ID", "customer_id", "row_uuid", "id_card", "index"] {
            assert!(is_identifier_name(name), "{name}");
        }
        for name in ["idea", "width", "valid", "price", "kidney"] {
            assert!(!is_identifier_name(name), "{name}");
        }
    }

    #[test]
    fn numeric_requires_high_parse_share() {
        let options = PrepOptions::default();
        let profile = profile_cells("a".into(), &cells(&["1", "2", "x"]), false, &options);
        assert_eq!(profile.kind, ColumnKind::Categorical);
        let profile = profile_cells("a".into(), &cells(&["1", "2", "", "3"]), false, &options);
        assert_eq!(profile.kind, ColumnKind::Numeric);
        assert_eq!(profile.missing, 1);
        assert_eq!(profile.non_missing, 3);
    }

    #[test]
    fn all_missing_defaults_to_categorical() {
        let profile = profile_cells(
            "empty".into(),
            &cells(&["", "", ""]),
            true,
            &PrepOptions::default(),
        );
        assert_eq!(profile.kind, ColumnKind::Categorical);
        assert!(profile.is_all_missing());
        assert!(!profile.is_id_like);
    }

    #[test]
    fn unique_target_is_id_like_but_unique_feature_is_not() {
        let options = PrepOptions::default();
        let values = cells(&["a", "b", "c", "d"]);
        assert!(profile_cells("label".into(), &values, true, &options).is_id_like);
        assert!(!profile_cells("label".into(), &values, false, &options).is_id_like);
        assert!(profile_cells("user_id".into(), &values, false, &options).is_id_like);
    }

    #[test]
    fn unique_ratio_must_exceed_threshold() {
        let values = cells(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "9"]);
        let at_threshold = PrepOptions::default().with_id_unique_ratio(0.9);
        let profile = profile_cells("row_id".into(), &values, false, &at_threshold);
        assert!((profile.unique_ratio() - 0.9).abs() < 1e-12);
        assert!(!profile.is_id_like);
        let below = PrepOptions::default().with_id_unique_ratio(0.85);
        assert!(profile_cells("row_id".into(), &values, false, &below).is_id_like);
    }

    #[test]
    fn repeated_identifier_values_are_not_id_like() {
        let options = PrepOptions::default();
        let values = cells(&["1", "1", "2", "2"]);
        assert!(!profile_cells("id".into(), &values, false, &options).is_id_like);
    }
}
