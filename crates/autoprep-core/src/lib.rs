//! Leakage-safe preprocessing engine.
//!
//! Turns a raw frame of string columns into numeric train/test artifacts.
//! Every stateful stage is fit on the training fold only and applied
//! unchanged to the test fold; see [`pipeline`] for the stage order.

pub mod artifacts;
pub mod cleaning;
pub mod error;
pub mod fold;
pub mod frame;
pub mod impute;
pub mod outliers;
pub mod pipeline;
pub mod quality;
pub mod split;
pub mod target;
pub mod transform;

pub use artifacts::ProcessedArtifacts;
pub use cleaning::{normalize_column_name, normalize_column_names, remove_duplicate_rows};
pub use error::{PrepError, Result};
pub use fold::FoldTransform;
pub use impute::FittedImputer;
pub use outliers::FittedCapper;
pub use pipeline::{DatasetProfile, PrepOutput, profile_dataset, run_pipeline};
pub use split::SplitPlan;
pub use target::{TargetDecision, validate_target};
pub use transform::FittedTransform;
