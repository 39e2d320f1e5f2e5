//! End-to-end preprocessing run.
//!
//! # Stage order
//!
//! 1. **clean** - normalize column names, count raw missing cells, drop duplicate rows
//! 2. **profile** - infer column kinds and ID-likeness
//! 3. **target** - decide supervised or unsupervised handling
//! 4. **split** - drop unlabelled rows and assign train/test rows
//! 5. **impute** - fit fill constants on train, apply to both folds
//! 6. **outliers** - fit IQR bounds on train, count and cap both folds
//! 7. **transform** - fit encoder/scaler on train, apply to both folds
//!
//! Nothing stateful is fit before the split, and every fitted stage is
//! applied to the test fold with the constants learned from the training fold.

use std::collections::BTreeSet;
use std::time::Instant;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{debug, info, info_span};

use autoprep_common::{column_cells, parse_f64};
use autoprep_ingest::build_column_profiles;
use autoprep_model::{
    ColumnIssue, ColumnProfile, ColumnRename, Diagnostics, MissingCount, OutlierReport,
    PrepOptions, ProblemType,
};

use crate::artifacts::ProcessedArtifacts;
use crate::cleaning::{normalize_column_name, normalize_column_names, remove_duplicate_rows};
use crate::error::{PrepError, Result};
use crate::fold::FoldTransform;
use crate::frame::{filter_rows, to_typed_frame};
use crate::impute::FittedImputer;
use crate::outliers::FittedCapper;
use crate::quality::{self, QualityInputs};
use crate::split::{SplitPlan, random_split, stratified_split};
use crate::target::{TargetDecision, validate_target};
use crate::transform::FittedTransform;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PrepOutput {
    pub artifacts: ProcessedArtifacts,
    pub diagnostics: Diagnostics,
}

/// Train and optional test fold moving through the fitted stages together.
struct Folds {
    train: DataFrame,
    test: Option<DataFrame>,
}

impl Folds {
    fn apply(&self, stage: &dyn FoldTransform) -> Result<Self> {
        let start = Instant::now();
        let train = stage.apply(&self.train)?;
        let test = self.test.as_ref().map(|fold| stage.apply(fold)).transpose()?;
        debug!(
            stage = stage.stage(),
            columns = train.width(),
            duration_ms = start.elapsed().as_millis(),
            "stage applied"
        );
        Ok(Self { train, test })
    }

    fn frames(&self) -> impl Iterator<Item = &DataFrame> {
        [Some(&self.train), self.test.as_ref()].into_iter().flatten()
    }

    fn null_count(&self, column: &str) -> usize {
        self.frames()
            .filter_map(|fold| fold.column(column).ok())
            .map(Column::null_count)
            .sum()
    }

    fn total_null_count(&self) -> usize {
        self.frames()
            .flat_map(DataFrame::get_columns)
            .map(Column::null_count)
            .sum()
    }
}

/// Labels split in lockstep with the feature folds.
struct Labels {
    train: Column,
    test: Column,
}

/// Cleaned, profiled frame ready for the target decision.
struct Cleaned {
    frame: DataFrame,
    renames: Vec<ColumnRename>,
    raw_missing: Vec<(String, usize)>,
    duplicates_removed: usize,
}

/// Column profiles and the target decision for a dataset, without fitting
/// anything.
#[derive(Debug, Clone)]
pub struct DatasetProfile {
    pub profiles: Vec<ColumnProfile>,
    pub decision: TargetDecision,
    pub renamed_columns: Vec<ColumnRename>,
    pub duplicates_removed: usize,
    /// Rows left after deduplication.
    pub rows: usize,
}

/// Clean and profile `raw` and decide the processing mode.
pub fn profile_dataset(
    raw: &DataFrame,
    target: Option<&str>,
    options: &PrepOptions,
) -> Result<DatasetProfile> {
    let prepared = prepare(raw, target, options)?;
    Ok(DatasetProfile {
        rows: prepared.cleaned.frame.height(),
        profiles: prepared.profiles,
        decision: prepared.decision,
        renamed_columns: prepared.cleaned.renames,
        duplicates_removed: prepared.cleaned.duplicates_removed,
    })
}

/// Output of the stages that run before the target decision.
struct Prepared {
    cleaned: Cleaned,
    profiles: Vec<ColumnProfile>,
    decision: TargetDecision,
}

fn prepare(raw: &DataFrame, target: Option<&str>, options: &PrepOptions) -> Result<Prepared> {
    options.validate()?;
    if raw.width() == 0 {
        return Err(PrepError::NoColumns);
    }
    if raw.height() == 0 {
        return Err(PrepError::EmptyDataset);
    }
    let cleaned = info_span!("clean").in_scope(|| clean(raw, options))?;
    let target = target.map(|name| resolve_target(name, &cleaned.renames, &cleaned.frame));

    let profiles = info_span!("profile")
        .in_scope(|| build_column_profiles(&cleaned.frame, target.as_deref(), options));

    let decision = info_span!("target").in_scope(|| {
        let decision = validate_target(target.as_deref(), &profiles);
        match decision.reason() {
            Some(reason) => info!(mode = %decision.mode(), reason = %reason, "target decided"),
            None => info!(
                mode = %decision.mode(),
                column = decision.target().unwrap_or_default(),
                "target decided"
            ),
        }
        decision
    });
    Ok(Prepared {
        cleaned,
        profiles,
        decision,
    })
}

/// Run the whole engine on a raw frame of string columns.
///
/// `target` may use either the original or the normalized column name.
/// Only dataset-level problems are returned as errors; column-level
/// conditions and target fallbacks are reported in the diagnostics.
pub fn run_pipeline(
    raw: &DataFrame,
    target: Option<&str>,
    options: &PrepOptions,
) -> Result<PrepOutput> {
    let run_start = Instant::now();
    let Prepared {
        cleaned,
        profiles,
        decision,
    } = prepare(raw, target, options)?;
    let df = &cleaned.frame;

    let mut diagnostics = Diagnostics::new(decision.mode());
    diagnostics.unsupervised_reason = decision.reason().cloned();
    diagnostics.target = decision.target().map(str::to_string);
    diagnostics.problem_type = decision.problem();
    diagnostics.renamed_columns = cleaned.renames.clone();
    diagnostics.raw_rows = raw.height();
    diagnostics.raw_features = raw.width();
    diagnostics.duplicates_removed = cleaned.duplicates_removed;

    let feature_profiles = select_features(&profiles, &decision, options, &mut diagnostics);
    if feature_profiles.is_empty() {
        return Err(PrepError::NoFeatures);
    }
    let (features, coercions) = to_typed_frame(df, &feature_profiles)?;
    diagnostics.issues.extend(coercions);

    let (folds, labels) = info_span!("split").in_scope(|| -> Result<_> {
        split(df, features, &decision, options, &mut diagnostics)
    })?;
    diagnostics.profiles = profiles;
    diagnostics.feature_cells_missing = folds.total_null_count();

    let folds = info_span!("impute").in_scope(|| -> Result<_> {
        let (imputer, issues) = FittedImputer::fit(&folds.train)?;
        diagnostics.issues.extend(issues);
        if imputer.fills.is_empty() {
            return Err(PrepError::NoFeatures);
        }
        folds.apply(&imputer)
    })?;
    diagnostics.missing = cleaned
        .raw_missing
        .iter()
        .map(|(column, before)| MissingCount {
            column: column.clone(),
            before: *before,
            after: folds.null_count(column),
        })
        .collect();

    let folds = info_span!("outliers").in_scope(|| -> Result<_> {
        let (capper, issues) =
            FittedCapper::fit(&folds.train, options.iqr_multiplier, options.cap_outliers)?;
        diagnostics.issues.extend(issues);
        let before = count_outliers(&capper, &folds)?;
        let capped = folds.apply(&capper)?;
        let after = count_outliers(&capper, &capped)?;
        diagnostics.outliers = capper
            .columns
            .iter()
            .zip(before.iter().zip(&after))
            .map(|(entry, (before, after))| OutlierReport {
                column: entry.column.clone(),
                bounds: entry.bounds,
                before: *before,
                after: *after,
            })
            .collect();
        diagnostics.outliers_before = before.iter().sum();
        diagnostics.outliers_after = after.iter().sum();
        info!(
            before = diagnostics.outliers_before,
            after = diagnostics.outliers_after,
            capped = options.cap_outliers,
            "outliers handled"
        );
        Ok(capped)
    })?;

    let folds = info_span!("transform").in_scope(|| -> Result<_> {
        let (transform, issues) = FittedTransform::fit(&folds.train)?;
        diagnostics.issues.extend(issues);
        if let Some(test) = &folds.test {
            for (column, count) in transform.unseen_counts(test)? {
                diagnostics
                    .issues
                    .push(ColumnIssue::UnseenCategories { column, count });
            }
        }
        diagnostics.feature_names = transform.feature_names();
        folds.apply(&transform)
    })?;

    diagnostics.processed_features = folds.train.width();
    diagnostics.quality = quality::score(&QualityInputs {
        feature_cells_missing: diagnostics.feature_cells_missing,
        outliers_before: diagnostics.outliers_before,
        outliers_after: diagnostics.outliers_after,
        duplicates_removed: diagnostics.duplicates_removed,
        raw_features: diagnostics.raw_features,
        processed_features: diagnostics.processed_features,
    });

    let artifacts = match (folds, labels) {
        (
            Folds {
                train,
                test: Some(test),
            },
            Some(labels),
        ) => ProcessedArtifacts::Supervised {
            x_train: train,
            x_test: test,
            y_train: DataFrame::new(vec![labels.train])?,
            y_test: DataFrame::new(vec![labels.test])?,
        },
        (folds, _) => ProcessedArtifacts::Unsupervised { x_train: folds.train },
    };
    info!(
        mode = %diagnostics.mode,
        train_rows = diagnostics.train_rows,
        test_rows = diagnostics.test_rows,
        features = diagnostics.processed_features,
        quality = diagnostics.quality.score,
        duration_ms = run_start.elapsed().as_millis(),
        "preprocessing complete"
    );
    Ok(PrepOutput {
        artifacts,
        diagnostics,
    })
}

fn clean(raw: &DataFrame, options: &PrepOptions) -> Result<Cleaned> {
    let start = Instant::now();
    let (frame, renames) = normalize_column_names(raw)?;
    let raw_missing = frame
        .get_columns()
        .iter()
        .map(|column| {
            let missing = column_cells(column).iter().filter(|cell| cell.is_none()).count();
            (column.name().to_string(), missing)
        })
        .collect();
    let (frame, duplicates_removed) = if options.remove_duplicates {
        remove_duplicate_rows(&frame)?
    } else {
        (frame, 0)
    };
    debug!(
        renamed = renames.len(),
        duplicates_removed,
        rows = frame.height(),
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok(Cleaned {
        frame,
        renames,
        raw_missing,
        duplicates_removed,
    })
}

/// Map a user-supplied target name onto the normalized column set.
fn resolve_target(name: &str, renames: &[ColumnRename], df: &DataFrame) -> String {
    let trimmed = name.trim();
    if let Some(rename) = renames.iter().find(|rename| rename.from.trim() == trimmed) {
        return rename.to.clone();
    }
    let has_column = |candidate: &str| df.get_column_names().iter().any(|c| c.as_str() == candidate);
    if has_column(trimmed) {
        return trimmed.to_string();
    }
    let normalized = normalize_column_name(trimmed);
    if !normalized.is_empty() && has_column(&normalized) {
        return normalized;
    }
    trimmed.to_string()
}

fn select_features(
    profiles: &[ColumnProfile],
    decision: &TargetDecision,
    options: &PrepOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<ColumnProfile> {
    let target = decision.target();
    let mut features = Vec::new();
    for profile in profiles {
        if Some(profile.name.as_str()) == target {
            continue;
        }
        if options.drop_id_like_features && profile.is_id_like {
            debug!(column = %profile.name, "dropping ID-like feature");
            diagnostics.issues.push(ColumnIssue::IdLikeFeatureDropped {
                column: profile.name.clone(),
            });
            continue;
        }
        features.push(profile.clone());
    }
    features
}

fn split(
    df: &DataFrame,
    features: DataFrame,
    decision: &TargetDecision,
    options: &PrepOptions,
    diagnostics: &mut Diagnostics,
) -> Result<(Folds, Option<Labels>)> {
    let TargetDecision::Supervised { target, problem } = decision else {
        let plan = SplitPlan::train_only(features.height());
        diagnostics.train_rows = plan.train.len();
        return Ok((
            Folds {
                train: features,
                test: None,
            },
            None,
        ));
    };

    let cells = column_cells(df.column(target)?);
    let encoded = encode_labels(target, &cells, *problem);
    let keep: Vec<bool> = encoded.codes.iter().map(Option::is_some).collect();
    diagnostics.unlabelled_rows_dropped = keep.iter().filter(|kept| !**kept).count();
    let features = filter_rows(&features, &keep)?;
    let labels: Vec<f64> = encoded.codes.iter().flatten().copied().collect();

    let plan = if *problem == ProblemType::Classification && options.stratify {
        let classes: Vec<String> = labels
            .iter()
            .map(|code| encoded.classes[*code as usize].clone())
            .collect();
        stratified_split(&classes, options.test_share(), options.seed)
    } else {
        random_split(labels.len(), options.test_share(), options.seed)
    };
    diagnostics.train_rows = plan.train.len();
    diagnostics.test_rows = plan.test.len();
    info!(
        train_rows = plan.train.len(),
        test_rows = plan.test.len(),
        stratified = plan.stratified,
        unlabelled = diagnostics.unlabelled_rows_dropped,
        "split complete"
    );
    diagnostics.class_labels = encoded.classes;

    let pick = |rows: &[usize]| rows.iter().map(|&row| labels[row]).collect::<Vec<f64>>();
    let label_column = |values: Vec<f64>| match problem {
        ProblemType::Regression => Series::new(target.as_str().into(), values).into_column(),
        ProblemType::Classification => Series::new(
            target.as_str().into(),
            values.into_iter().map(|code| code as i64).collect::<Vec<i64>>(),
        )
        .into_column(),
    };
    let folds = Folds {
        train: filter_rows(&features, &plan.train_mask())?,
        test: Some(filter_rows(&features, &plan.test_mask())?),
    };
    let labels = Labels {
        train: label_column(pick(&plan.train)),
        test: label_column(pick(&plan.test)),
    };
    Ok((folds, Some(labels)))
}

struct EncodedLabels {
    /// One entry per row; `None` marks an unlabelled row.
    codes: Vec<Option<f64>>,
    /// Sorted class vocabulary; empty for regression.
    classes: Vec<String>,
}

/// Regression labels are parsed as numbers; classification labels become
/// indices into the sorted set of observed labels.
fn encode_labels(target: &str, cells: &[Option<String>], problem: ProblemType) -> EncodedLabels {
    match problem {
        ProblemType::Regression => {
            let codes: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| cell.as_deref().and_then(parse_f64))
                .collect();
            let unparsed = cells
                .iter()
                .zip(&codes)
                .filter(|(cell, code)| cell.is_some() && code.is_none())
                .count();
            if unparsed > 0 {
                debug!(column = %target, unparsed, "non-numeric target values treated as unlabelled");
            }
            EncodedLabels {
                codes,
                classes: Vec::new(),
            }
        }
        ProblemType::Classification => {
            let classes: Vec<String> = cells
                .iter()
                .flatten()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let codes = cells
                .iter()
                .map(|cell| {
                    cell.as_deref().and_then(|value| {
                        classes
                            .binary_search_by(|class| class.as_str().cmp(value))
                            .ok()
                            .map(|idx| idx as f64)
                    })
                })
                .collect();
            EncodedLabels { codes, classes }
        }
    }
}

fn count_outliers(capper: &FittedCapper, folds: &Folds) -> Result<Vec<usize>> {
    let mut totals = capper.count_outliers(&folds.train)?;
    if let Some(test) = &folds.test {
        for (total, count) in totals.iter_mut().zip(capper.count_outliers(test)?) {
            *total += count;
        }
    }
    Ok(totals)
}
