//! Error types for the relaxation engine.

use thiserror::Error;

/// Errors raised before the simplex starts pivoting.
///
/// Infeasibility and unboundedness are not errors; they are reported
/// through [`crate::SolveStatus`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Problem dimensions or data are inconsistent
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}

/// Result type for relaxation engine operations.
pub type CoreResult<T> = Result<T, SolveError>;
