//! Missing-value imputation: training median for numeric columns, training
//! mode for categorical columns.

use std::collections::HashMap;

use polars::prelude::{ChunkFillNullValue, ChunkQuantile, ChunkSet, DataFrame, IntoColumn};
use tracing::{debug, warn};

use autoprep_model::{ColumnIssue, ColumnKind};

use crate::error::Result;
use crate::fold::FoldTransform;
use crate::frame::{column_kind, f64_chunked, str_chunked};

/// Constant used to fill one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Median(f64),
    Mode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFill {
    pub column: String,
    pub value: FillValue,
}

/// Fill constants learned from the training fold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FittedImputer {
    pub fills: Vec<ColumnFill>,
    /// Columns with no training values; removed from every fold.
    pub dropped: Vec<String>,
}

impl FittedImputer {
    /// Learn one fill constant per column of `train`.
    pub fn fit(train: &DataFrame) -> Result<(Self, Vec<ColumnIssue>)> {
        let mut fitted = Self::default();
        let mut issues = Vec::new();
        for column in train.get_columns() {
            let name = column.name().to_string();
            let value = match column_kind(column)? {
                ColumnKind::Numeric => f64_chunked(train, &name)?.median().map(FillValue::Median),
                ColumnKind::Categorical => {
                    mode(str_chunked(train, &name)?.into_iter().flatten()).map(FillValue::Mode)
                }
            };
            match value {
                Some(value) => {
                    debug!(column = %name, fill = ?value, "imputer fitted");
                    fitted.fills.push(ColumnFill {
                        column: name,
                        value,
                    });
                }
                None => {
                    warn!(column = %name, "no training values, dropping column");
                    issues.push(ColumnIssue::AllMissingColumn {
                        column: name.clone(),
                    });
                    fitted.dropped.push(name);
                }
            }
        }
        Ok((fitted, issues))
    }

    pub fn fill_for(&self, column: &str) -> Option<&FillValue> {
        self.fills
            .iter()
            .find(|fill| fill.column == column)
            .map(|fill| &fill.value)
    }
}

impl FoldTransform for FittedImputer {
    fn stage(&self) -> &'static str {
        "impute"
    }

    fn apply(&self, fold: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.fills.len());
        for fill in &self.fills {
            let column = match &fill.value {
                FillValue::Median(median) => f64_chunked(fold, &fill.column)?
                    .fill_null_with_values(*median)?
                    .into_column(),
                FillValue::Mode(mode) => {
                    let values = str_chunked(fold, &fill.column)?;
                    values
                        .set(&values.is_null(), Some(mode.as_str()))?
                        .into_column()
                }
            };
            columns.push(column);
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Most frequent value; ties go to the value seen first.
pub fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{f64_column, f64_values, str_column};

    #[test]
    fn mode_breaks_ties_by_first_occurrence() {
        assert_eq!(mode(["b", "a", "a", "b"].into_iter()), Some("b".into()));
        assert_eq!(mode(["x", "y", "y"].into_iter()), Some("y".into()));
        assert_eq!(mode(std::iter::empty()), None);
    }

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        let train = DataFrame::new(vec![f64_column(
            "x",
            vec![Some(4.0), Some(1.0), None, Some(3.0), Some(2.0)],
        )])
        .unwrap();
        let (imputer, _) = FittedImputer::fit(&train).unwrap();
        assert_eq!(imputer.fill_for("x"), Some(&FillValue::Median(2.5)));
        let filled = imputer.apply(&train).unwrap();
        assert_eq!(filled.column("x").unwrap().null_count(), 0);
        assert_eq!(f64_values(&filled, "x").unwrap()[2], Some(2.5));
    }

    #[test]
    fn fills_with_training_constants() {
        let train = DataFrame::new(vec![
            f64_column("age", vec![Some(1.0), None, Some(3.0), Some(10.0)]),
            str_column(
                "city",
                vec![Some("oslo".into()), Some("rome".into()), None, Some("rome".into())],
            ),
        ])
        .unwrap();
        let (imputer, issues) = FittedImputer::fit(&train).unwrap();
        assert!(issues.is_empty());
        assert_eq!(imputer.fill_for("age"), Some(&FillValue::Median(3.0)));
        assert_eq!(imputer.fill_for("city"), Some(&FillValue::Mode("rome".into())));

        let test = DataFrame::new(vec![
            f64_column("age", vec![None, Some(99.0)]),
            str_column("city", vec![None, Some("paris".into())]),
        ])
        .unwrap();
        let filled = imputer.apply(&test).unwrap();
        assert_eq!(f64_values(&filled, "age").unwrap(), vec![Some(3.0), Some(99.0)]);
        assert_eq!(
            str_chunked(&filled, "city")
                .unwrap()
                .into_iter()
                .collect::<Vec<_>>(),
            vec![Some("rome"), Some("paris")]
        );
    }

    #[test]
    fn all_missing_training_column_is_dropped() {
        let train = DataFrame::new(vec![
            f64_column("keep", vec![Some(1.0), Some(2.0)]),
            f64_column("empty", vec![None, None]),
        ])
        .unwrap();
        let (imputer, issues) = FittedImputer::fit(&train).unwrap();
        assert_eq!(imputer.dropped, vec!["empty".to_string()]);
        assert_eq!(
            issues,
            vec![ColumnIssue::AllMissingColumn {
                column: "empty".into()
            }]
        );
        let applied = imputer.apply(&train).unwrap();
        assert_eq!(applied.width(), 1);
    }
}
