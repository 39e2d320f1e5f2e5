use polars::prelude::DataFrame;

use autoprep_model::ProcessingMode;

/// Final numeric frames produced by a run.
#[derive(Debug, Clone)]
pub enum ProcessedArtifacts {
    Supervised {
        x_train: DataFrame,
        x_test: DataFrame,
        y_train: DataFrame,
        y_test: DataFrame,
    },
    Unsupervised {
        x_train: DataFrame,
    },
}

impl ProcessedArtifacts {
    pub fn mode(&self) -> ProcessingMode {
        match self {
            ProcessedArtifacts::Supervised { .. } => ProcessingMode::Supervised,
            ProcessedArtifacts::Unsupervised { .. } => ProcessingMode::Unsupervised,
        }
    }

    pub fn x_train(&self) -> &DataFrame {
        match self {
            ProcessedArtifacts::Supervised { x_train, .. }
            | ProcessedArtifacts::Unsupervised { x_train } => x_train,
        }
    }

    pub fn x_test(&self) -> Option<&DataFrame> {
        match self {
            ProcessedArtifacts::Supervised { x_test, .. } => Some(x_test),
            ProcessedArtifacts::Unsupervised { .. } => None,
        }
    }

    pub fn y_train(&self) -> Option<&DataFrame> {
        match self {
            ProcessedArtifacts::Supervised { y_train, .. } => Some(y_train),
            ProcessedArtifacts::Unsupervised { .. } => None,
        }
    }

    pub fn y_test(&self) -> Option<&DataFrame> {
        match self {
            ProcessedArtifacts::Supervised { y_test, .. } => Some(y_test),
            ProcessedArtifacts::Unsupervised { .. } => None,
        }
    }

    /// Artifacts with their export names, in export order.
    pub fn named(&self) -> Vec<(&'static str, &DataFrame)> {
        match self {
            ProcessedArtifacts::Supervised {
                x_train,
                x_test,
                y_train,
                y_test,
            } => vec![
                ("X_train", x_train),
                ("X_test", x_test),
                ("y_train", y_train),
                ("y_test", y_test),
            ],
            ProcessedArtifacts::Unsupervised { x_train } => vec![("X_train", x_train)],
        }
    }
}
