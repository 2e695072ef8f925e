//! Error types for biquad design

use thiserror::Error;

/// Coefficient derivation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// A parameter fails a precondition (non-finite, non-positive, above Nyquist)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Normalization divisor a0 is zero or not finite
    #[error("Degenerate filter: a0 = {a0}")]
    DegenerateFilter { a0: f64 },

    /// Shelf alpha square-root argument is negative
    #[error("Domain error: shelf slope radicand {radicand:.6} < 0 (q = {q}, boost = {boost_db} dB)")]
    DomainError { radicand: f64, q: f64, boost_db: f64 },
}

impl CalcError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias
pub type CalcResult<T> = Result<T, CalcError>;
