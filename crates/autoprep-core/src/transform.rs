//! Encoding and scaling fit once on the training fold.
//!
//! Numeric columns are standardized with the training mean and population
//! standard deviation; categorical columns are one-hot encoded against the
//! sorted training vocabulary. Numeric features come first, then the
//! indicator columns, in the order fixed at fit time.

use std::collections::{BTreeSet, HashSet};

use polars::prelude::{ChunkAgg, ChunkApply, ChunkVar, DataFrame, IntoColumn};
use tracing::debug;

use autoprep_model::{ColumnIssue, ColumnKind};

use crate::error::Result;
use crate::fold::FoldTransform;
use crate::frame::{column_kind, f64_chunked, f64_column, str_chunked};

/// Relative tolerance under which a training standard deviation counts as zero.
const ZERO_VARIANCE_EPS: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct Standardize {
    pub column: String,
    pub mean: f64,
    /// `None` for zero-variance columns, which are only centered.
    pub std: Option<f64>,
}

impl Standardize {
    pub fn scale(&self, value: f64) -> f64 {
        let centered = value - self.mean;
        match self.std {
            Some(std) => centered / std,
            None => centered,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneHot {
    pub column: String,
    /// Sorted training categories.
    pub categories: Vec<String>,
    /// Output column per category, same order as `categories`.
    pub feature_names: Vec<String>,
}

impl OneHot {
    fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|category| category.as_str().cmp(value))
            .ok()
    }
}

/// Fitted encoder + scaler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FittedTransform {
    pub numeric: Vec<Standardize>,
    pub categorical: Vec<OneHot>,
}

impl FittedTransform {
    pub fn fit(train: &DataFrame) -> Result<(Self, Vec<ColumnIssue>)> {
        let mut fitted = Self::default();
        let mut issues = Vec::new();
        let mut categorical = Vec::new();
        for column in train.get_columns() {
            let name = column.name().to_string();
            match column_kind(column)? {
                ColumnKind::Numeric => {
                    let values = f64_chunked(train, &name)?;
                    let mean = values.mean().unwrap_or(0.0);
                    let std = values.std(0).unwrap_or(0.0);
                    let std = if std > ZERO_VARIANCE_EPS * (1.0 + mean.abs()) {
                        Some(std)
                    } else {
                        issues.push(ColumnIssue::ZeroVariance {
                            column: name.clone(),
                        });
                        None
                    };
                    debug!(column = %name, mean, std = ?std, "scaler fitted");
                    fitted.numeric.push(Standardize {
                        column: name,
                        mean,
                        std,
                    });
                }
                ColumnKind::Categorical => {
                    let categories: BTreeSet<String> = str_chunked(train, &name)?
                        .into_iter()
                        .flatten()
                        .map(str::to_string)
                        .collect();
                    categorical.push((name, categories.into_iter().collect::<Vec<_>>()));
                }
            }
        }

        let mut taken: HashSet<String> = fitted
            .numeric
            .iter()
            .map(|step| step.column.clone())
            .collect();
        for (column, categories) in categorical {
            let feature_names = categories
                .iter()
                .map(|category| unique_name(&mut taken, format!("{column}_{category}")))
                .collect();
            debug!(column = %column, categories = categories.len(), "encoder fitted");
            fitted.categorical.push(OneHot {
                column,
                categories,
                feature_names,
            });
        }
        Ok((fitted, issues))
    }

    /// Output column names in their fixed order.
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric
            .iter()
            .map(|step| step.column.clone())
            .chain(
                self.categorical
                    .iter()
                    .flat_map(|step| step.feature_names.iter().cloned()),
            )
            .collect()
    }

    /// Values per categorical column that fall outside the training vocabulary.
    pub fn unseen_counts(&self, fold: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut counts = Vec::new();
        for step in &self.categorical {
            let unseen = str_chunked(fold, &step.column)?
                .into_iter()
                .flatten()
                .filter(|value| step.position(value).is_none())
                .count();
            if unseen > 0 {
                counts.push((step.column.clone(), unseen));
            }
        }
        Ok(counts)
    }
}

fn unique_name(taken: &mut HashSet<String>, base: String) -> String {
    let mut candidate = base.clone();
    let mut suffix = 2usize;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    candidate
}

impl FoldTransform for FittedTransform {
    fn stage(&self) -> &'static str {
        "transform"
    }

    fn apply(&self, fold: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::new();
        for step in &self.numeric {
            let scaled = f64_chunked(fold, &step.column)?.apply_values(|v| step.scale(v));
            columns.push(scaled.into_column());
        }
        for step in &self.categorical {
            let positions: Vec<Option<usize>> = str_chunked(fold, &step.column)?
                .into_iter()
                .map(|value| value.and_then(|v| step.position(v)))
                .collect();
            for (idx, feature) in step.feature_names.iter().enumerate() {
                let values = positions
                    .iter()
                    .map(|position| Some(if *position == Some(idx) { 1.0 } else { 0.0 }))
                    .collect();
                columns.push(f64_column(feature, values));
            }
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{column_names, f64_values, str_column};

    fn train() -> DataFrame {
        DataFrame::new(vec![
            str_column(
                "color",
                vec![Some("red".into()), Some("blue".into()), Some("red".into())],
            ),
            f64_column("size", vec![Some(1.0), Some(2.0), Some(3.0)]),
            f64_column("flat", vec![Some(7.0), Some(7.0), Some(7.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn numeric_features_precede_sorted_indicators() {
        let (fitted, issues) = FittedTransform::fit(&train()).unwrap();
        assert_eq!(
            fitted.feature_names(),
            vec!["size", "flat", "color_blue", "color_red"]
        );
        assert_eq!(
            issues,
            vec![ColumnIssue::ZeroVariance {
                column: "flat".into()
            }]
        );
        let out = fitted.apply(&train()).unwrap();
        assert_eq!(column_names(&out), fitted.feature_names());
        let size = f64_values(&out, "size").unwrap();
        let mean: f64 = size.iter().flatten().sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-12);
        assert_eq!(
            f64_values(&out, "flat").unwrap(),
            vec![Some(0.0), Some(0.0), Some(0.0)]
        );
        assert_eq!(
            f64_values(&out, "color_red").unwrap(),
            vec![Some(1.0), Some(0.0), Some(1.0)]
        );
    }

    #[test]
    fn scaler_uses_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let df = DataFrame::new(vec![f64_column(
            "x",
            values.iter().copied().map(Some).collect(),
        )])
        .unwrap();
        let (fitted, _) = FittedTransform::fit(&df).unwrap();
        let step = &fitted.numeric[0];
        assert!((step.mean - 5.0).abs() < 1e-12);
        assert!((step.std.unwrap() - 2.0).abs() < 1e-12);
        let out = f64_values(&fitted.apply(&df).unwrap(), "x").unwrap();
        assert!((out[7].unwrap() - 2.0).abs() < 1e-12);
        assert!((out[0].unwrap() + 1.5).abs() < 1e-12);
    }

    #[test]
    fn unseen_categories_encode_as_zeros() {
        let (fitted, _) = FittedTransform::fit(&train()).unwrap();
        let test = DataFrame::new(vec![
            str_column("color", vec![Some("green".into())]),
            f64_column("size", vec![Some(2.0)]),
            f64_column("flat", vec![Some(8.0)]),
        ])
        .unwrap();
        assert_eq!(
            fitted.unseen_counts(&test).unwrap(),
            vec![("color".to_string(), 1)]
        );
        let out = fitted.apply(&test).unwrap();
        assert_eq!(f64_values(&out, "color_blue").unwrap(), vec![Some(0.0)]);
        assert_eq!(f64_values(&out, "color_red").unwrap(), vec![Some(0.0)]);
        assert_eq!(f64_values(&out, "size").unwrap(), vec![Some(0.0)]);
        assert_eq!(f64_values(&out, "flat").unwrap(), vec![Some(1.0)]);
    }

    #[test]
    fn colliding_indicator_names_get_suffixes() {
        let df = DataFrame::new(vec![
            f64_column("a_b", vec![Some(1.0), Some(2.0)]),
            str_column("a", vec![Some("b".into()), Some("c".into())]),
        ])
        .unwrap();
        let (fitted, _) = FittedTransform::fit(&df).unwrap();
        assert_eq!(fitted.feature_names(), vec!["a_b", "a_b_2", "a_c"]);
    }
}
