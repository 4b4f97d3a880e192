//! Error types for estimation and portfolio analysis.

use thiserror::Error;

/// Input that makes a single computation meaningless. Fatal for that call only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("acceptance rate must be in (0, 1], got {0}")]
    AcceptanceRate(f64),

    #[error("quality score must be in [0, 100], got {0}")]
    QualityScore(f64),

    #[error("probability must be in [0, 100], got {0}")]
    Probability(f64),

    #[error("trial count must be positive")]
    Trials,

    #[error("shard size must be positive")]
    ShardSize,

    #[error("confidence level must be in (0, 1), got {0}")]
    ConfidenceLevel(f64),

    #[error("weight for {factor} must be finite and non-negative, got {value}")]
    Weight { factor: String, value: f64 },

    #[error("{probabilities} probabilities but {categories} categories")]
    LengthMismatch { probabilities: usize, categories: usize },

    #[error("invalid selectivity tier table: {reason}")]
    TierTable { reason: String },
}

/// Failure of one (student, college) estimate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// The college publishes no usable admissions statistics; no number is fabricated.
    #[error("no admissions statistics available for {college}")]
    NoCollegeData { college: String },
}

impl EstimateError {
    pub fn is_missing_data(&self) -> bool {
        matches!(self, EstimateError::NoCollegeData { .. })
    }
}

pub type EstimateResult<T> = Result<T, EstimateError>;
