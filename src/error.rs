//! Error types for the scheduling pipeline.
//!
//! Every stage either returns a fully formed result or fails with one of
//! these kinds. Degenerate inputs (disconnected conflict graphs, exams
//! nobody takes, zero-violation schedules) are valid outputs, not errors.
//! A non-zero violation count is reported, never raised.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Failure raised by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Malformed input: empty enrollment matrix, ragged rows, out-of-range
    /// exam ids, or an unusable configuration.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The symmetric eigensolver did not converge on the Laplacian.
    ///
    /// Not retried: the computation is deterministic for identical inputs.
    #[error("numerical failure: {message}")]
    Numerical { message: String },
}

impl ScheduleError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// Whether this is an input error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Whether this is a numerical error.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Numerical { .. })
    }
}
