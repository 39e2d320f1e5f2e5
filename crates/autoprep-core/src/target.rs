//! Target validation: decides once per run whether the nominated column can
//! serve as a supervised label.

use autoprep_model::{ColumnKind, ColumnProfile, ProblemType, ProcessingMode, UnsupervisedReason};

/// Outcome of target validation, consumed by every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDecision {
    Supervised {
        target: String,
        problem: ProblemType,
    },
    Unsupervised {
        reason: UnsupervisedReason,
    },
}

impl TargetDecision {
    pub fn mode(&self) -> ProcessingMode {
        match self {
            TargetDecision::Supervised { .. } => ProcessingMode::Supervised,
            TargetDecision::Unsupervised { .. } => ProcessingMode::Unsupervised,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            TargetDecision::Supervised { target, .. } => Some(target),
            TargetDecision::Unsupervised { .. } => None,
        }
    }

    pub fn problem(&self) -> Option<ProblemType> {
        match self {
            TargetDecision::Supervised { problem, .. } => Some(*problem),
            TargetDecision::Unsupervised { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&UnsupervisedReason> {
        match self {
            TargetDecision::Supervised { .. } => None,
            TargetDecision::Unsupervised { reason } => Some(reason),
        }
    }
}

/// Decide the processing mode for `target` against the column profiles.
///
/// Checks run in a fixed order: nothing nominated, unknown column, ID-like,
/// entirely missing, single distinct value.
pub fn validate_target(target: Option<&str>, profiles: &[ColumnProfile]) -> TargetDecision {
    let Some(target) = target.map(str::trim).filter(|name| !name.is_empty()) else {
        return unsupervised(UnsupervisedReason::NoTarget);
    };
    let Some(profile) = profiles.iter().find(|profile| profile.name == target) else {
        return unsupervised(UnsupervisedReason::TargetNotFound {
            target: target.to_string(),
        });
    };
    let target = profile.name.clone();
    if profile.is_id_like {
        return unsupervised(UnsupervisedReason::IdLikeTarget { target });
    }
    if profile.is_all_missing() {
        return unsupervised(UnsupervisedReason::AllMissingTarget { target });
    }
    if profile.distinct < 2 {
        return unsupervised(UnsupervisedReason::SingleValuedTarget { target });
    }
    let problem = match profile.kind {
        ColumnKind::Numeric => ProblemType::Regression,
        ColumnKind::Categorical => ProblemType::Classification,
    };
    TargetDecision::Supervised { target, problem }
}

fn unsupervised(reason: UnsupervisedReason) -> TargetDecision {
    TargetDecision::Unsupervised { reason }
}
