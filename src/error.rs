use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("covariance matrix has no eigenvalue above the numerical zero threshold")]
    DegenerateCovariance,

    #[error("expected {expected} input maps (one per basis group), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}
