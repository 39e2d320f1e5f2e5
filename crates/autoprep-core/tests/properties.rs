//! Property tests for the engine invariants.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

use autoprep_core::frame::{column_names, f64_column, f64_values, str_column};
use autoprep_core::split::random_split;
use autoprep_core::{
    FittedCapper, FittedTransform, FoldTransform, normalize_column_name, remove_duplicate_rows,
    run_pipeline,
};
use autoprep_model::PrepOptions;

fn string_frame(columns: Vec<(&str, Vec<String>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

proptest! {
    #[test]
    fn name_normalization_is_idempotent(raw in "[ -~]{0,24}") {
        let once = normalize_column_name(&raw);
        prop_assert_eq!(normalize_column_name(&once), once);
    }

    #[test]
    fn capping_keeps_rows_within_bounds(
        values in prop::collection::vec(-1000.0f64..1000.0, 1..60),
    ) {
        let train = DataFrame::new(vec![f64_column(
            "x",
            values.iter().copied().map(Some).collect(),
        )])
        .unwrap();
        let (capper, _) = FittedCapper::fit(&train, 1.5, true).unwrap();
        let capped = capper.apply(&train).unwrap();
        prop_assert_eq!(capped.height(), train.height());
        if let Some(bounds) = capper.bounds_for("x") {
            for value in f64_values(&capped, "x").unwrap().into_iter().flatten() {
                prop_assert!(value >= bounds.lower && value <= bounds.upper);
            }
            prop_assert_eq!(capper.count_outliers(&capped).unwrap(), vec![0]);
        }
    }

    #[test]
    fn dedupe_removes_exactly_the_injected_copies(
        rows in 1usize..40,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..15),
    ) {
        let mut keys: Vec<String> = (0..rows).map(|i| format!("r{i}")).collect();
        let mut values: Vec<String> = (0..rows).map(|i| (i % 3).to_string()).collect();
        for pick in &picks {
            let source = pick.index(rows);
            keys.push(keys[source].clone());
            values.push(values[source].clone());
        }
        let df = string_frame(vec![("key", keys), ("value", values)]);
        let (deduped, removed) = remove_duplicate_rows(&df).unwrap();
        prop_assert_eq!(removed, picks.len());
        prop_assert_eq!(deduped.height(), rows);
    }

    #[test]
    fn transformed_folds_share_columns(
        train_cats in prop::collection::vec("[a-d]", 1..20),
        test_cats in prop::collection::vec("[a-f]", 1..20),
    ) {
        let frame = |cats: &[String]| {
            DataFrame::new(vec![
                str_column("cat", cats.iter().cloned().map(Some).collect()),
                f64_column("num", (0..cats.len()).map(|i| Some(i as f64)).collect()),
            ])
            .unwrap()
        };
        let train = frame(&train_cats[..]);
        let test = frame(&test_cats[..]);
        let (fitted, _) = FittedTransform::fit(&train).unwrap();
        let train_out = fitted.apply(&train).unwrap();
        let test_out = fitted.apply(&test).unwrap();
        prop_assert_eq!(column_names(&train_out), column_names(&test_out));
        prop_assert_eq!(test_out.height(), test_cats.len());
    }

    #[test]
    fn test_fold_values_do_not_change_training_output(
        base in prop::collection::vec(0u32..1000, 20),
        replacement in 0.0f64..1.0e6,
    ) {
        let options = PrepOptions::default();
        let plan = random_split(base.len(), options.test_share(), options.seed);
        let build = |override_row: Option<usize>| {
            let x = base
                .iter()
                .enumerate()
                .map(|(i, v)| match override_row {
                    Some(row) if row == i => format!("{}", 1.0e7 + replacement),
                    _ => (v + i as u32 * 1000).to_string(),
                })
                .collect();
            let y = (0..base.len()).map(|i| (i % 4).to_string()).collect();
            string_frame(vec![("x", x), ("y", y)])
        };
        let original = run_pipeline(&build(None), Some("y"), &options).unwrap();
        let perturbed = run_pipeline(&build(Some(plan.test[0])), Some("y"), &options).unwrap();
        prop_assert!(
            original
                .artifacts
                .x_train()
                .equals_missing(perturbed.artifacts.x_train())
        );
        prop_assert_eq!(
            &original.diagnostics.outliers[0].bounds,
            &perturbed.diagnostics.outliers[0].bounds
        );
    }
}
