use polars::prelude::DataFrame;

use crate::error::Result;

/// State fit on the training fold and applied unchanged to any fold.
///
/// Fitting is a separate constructor on each implementor; `apply` only sees
/// the fitted constants, so a test fold can never feed back into them.
pub trait FoldTransform {
    /// Stage name used in logs.
    fn stage(&self) -> &'static str;

    fn apply(&self, fold: &DataFrame) -> Result<DataFrame>;
}
