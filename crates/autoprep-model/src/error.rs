use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("split ratio must be strictly between 0 and 1, got {0}")]
    SplitRatio(f64),
    #[error("IQR multiplier must be a positive finite number, got {0}")]
    IqrMultiplier(f64),
    #[error("{name} must be within (0, 1], got {value}")]
    Threshold { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, OptionsError>;
