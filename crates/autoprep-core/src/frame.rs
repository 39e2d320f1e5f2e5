//! Column access helpers over Polars frames.
//!
//! Inside the engine every fold is a `DataFrame` whose numeric columns are
//! `Float64` and whose categorical columns are `String`; the dtype is the
//! column kind from profiling onwards.

use polars::prelude::{
    BooleanChunked, Column, DataFrame, DataType, Float64Chunked, IntoColumn, NamedFrom,
    NewChunkedArray, Series, StringChunked,
};

use autoprep_common::{column_cells, parse_f64};
use autoprep_model::{ColumnIssue, ColumnKind, ColumnProfile};

use crate::error::{PrepError, Result};

/// Kind of a typed engine column.
pub fn column_kind(column: &Column) -> Result<ColumnKind> {
    match column.dtype() {
        DataType::Float64 => Ok(ColumnKind::Numeric),
        DataType::String => Ok(ColumnKind::Categorical),
        other => Err(PrepError::UnsupportedColumn {
            column: column.name().to_string(),
            dtype: other.to_string(),
        }),
    }
}

/// Typed view of a numeric engine column.
pub fn f64_chunked<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked> {
    Ok(df.column(name)?.as_materialized_series().f64()?)
}

/// Typed view of a categorical engine column.
pub fn str_chunked<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(f64_chunked(df, name)?.into_iter().collect())
}

pub fn f64_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn str_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Keep rows whose mask entry is true, preserving order.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    Ok(df.filter(&mask)?)
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Convert raw columns into typed engine columns using their profiles.
///
/// Numeric columns become `Float64`; cells that do not parse are read as
/// missing and reported as [`ColumnIssue::CoercedToMissing`].
pub fn to_typed_frame(
    df: &DataFrame,
    profiles: &[ColumnProfile],
) -> Result<(DataFrame, Vec<ColumnIssue>)> {
    let mut columns = Vec::with_capacity(profiles.len());
    let mut issues = Vec::new();
    for profile in profiles {
        let cells = column_cells(df.column(&profile.name)?);
        match profile.kind {
            ColumnKind::Numeric => {
                let mut coerced = 0usize;
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|cell| {
                        let cell = cell.as_deref()?;
                        let parsed = parse_f64(cell);
                        if parsed.is_none() {
                            coerced += 1;
                        }
                        parsed
                    })
                    .collect();
                if coerced > 0 {
                    issues.push(ColumnIssue::CoercedToMissing {
                        column: profile.name.clone(),
                        count: coerced,
                    });
                }
                columns.push(f64_column(&profile.name, values));
            }
            ColumnKind::Categorical => columns.push(str_column(&profile.name, cells)),
        }
    }
    Ok((DataFrame::new(columns)?, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::AnyValue;

    #[test]
    fn typed_frame_coerces_bad_numbers() {
        let df = DataFrame::new(vec![str_column(
            "age",
            vec![Some("1".into()), Some("two".into()), None],
        )])
        .unwrap();
        let profiles = vec![ColumnProfile {
            name: "age".into(),
            kind: ColumnKind::Numeric,
            missing: 1,
            non_missing: 2,
            distinct: 2,
            numeric_ratio: 0.5,
            is_id_like: false,
        }];
        let (typed, issues) = to_typed_frame(&df, &profiles).unwrap();
        assert_eq!(typed.column("age").unwrap().dtype(), &DataType::Float64);
        assert_eq!(typed.column("age").unwrap().get(0).unwrap(), AnyValue::Float64(1.0));
        assert_eq!(typed.column("age").unwrap().null_count(), 2);
        assert_eq!(
            issues,
            vec![ColumnIssue::CoercedToMissing {
                column: "age".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn filter_rows_keeps_order() {
        let df = DataFrame::new(vec![f64_column(
            "x",
            vec![Some(1.0), Some(2.0), Some(3.0)],
        )])
        .unwrap();
        let kept = filter_rows(&df, &[true, false, true]).unwrap();
        assert_eq!(f64_values(&kept, "x").unwrap(), vec![Some(1.0), Some(3.0)]);
    }
}
