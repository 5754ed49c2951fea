//! Error types for the MIP solver.

use thiserror::Error;

/// Errors that can occur during MIP solving.
///
/// Infeasible, unbounded or failed relaxations are not errors: the search
/// prunes those nodes and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MipError {
    /// Problem validation failed
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Relaxation could not be built for a node
    #[error("Relaxation construction failed: {0}")]
    RelaxationError(String),

    /// Internal solver invariant violated
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<bb_core::SolveError> for MipError {
    fn from(err: bb_core::SolveError) -> Self {
        MipError::RelaxationError(err.to_string())
    }
}

/// Result type for MIP operations.
pub type MipResult<T> = Result<T, MipError>;
