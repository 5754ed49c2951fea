//! Continuous relaxation of search nodes.

mod backend;
mod simplex_backend;

pub use backend::{Relaxation, RelaxationOutcome, RelaxationSolver};
pub use simplex_backend::SimplexRelaxation;
