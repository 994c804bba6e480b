// Season schedule: round robin, rivalry week, and matching-derived weeks.

pub mod builder;
pub mod matching;
pub mod pair;
pub mod round_robin;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Malformed divisions, rivals, or team counts. Fix the input and retry.
    #[error("invalid schedule input: {message}")]
    InvalidInput { message: String },

    /// No perfect matching exists for the given week under current limits.
    #[error("no valid matching exists for week {week}")]
    Infeasible { week: usize },

    /// The finished schedule broke an invariant. This is a bug in the
    /// builder, never an input problem.
    #[error("schedule validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ScheduleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ScheduleError::InvalidInput {
            message: message.into(),
        }
    }
}
