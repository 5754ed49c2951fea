//! Problem and solution types for MIP solver.

mod expr;
mod problem;
mod solution;

pub use expr::{Constraint, LinearExpr, Sense, VarId, VarType, Variable};
pub use problem::MipProblem;
pub use solution::{IncumbentTracker, MipSolution, MipStatus};
