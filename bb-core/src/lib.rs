//! Relaxation engine for the bb branch-and-bound solver.
//!
//! Solves linear programs in the canonical form
//!
//! ```text
//! minimize    q^T x
//! subject to  A x + s = b,  s ∈ K
//!             lb <= x <= ub
//! ```
//!
//! where K is a product of `Zero` (equality) and `NonNeg` (inequality)
//! cones, using a dense two-phase primal simplex.
//!
//! # Example
//!
//! ```
//! use bb_core::{solve, ConeSpec, ProblemData, SolverSettings, SolveStatus};
//! use bb_core::linalg::sparse;
//!
//! // min -x0 - x1 s.t. x0 + x1 <= 1, x0 - x1 = 0
//! let prob = ProblemData {
//!     q: vec![-1.0, -1.0],
//!     A: sparse::from_triplets(2, 2, vec![(0, 0, 1.0), (0, 1, -1.0), (1, 0, 1.0), (1, 1, 1.0)]),
//!     b: vec![0.0, 1.0],
//!     cones: vec![ConeSpec::Zero { dim: 1 }, ConeSpec::NonNeg { dim: 1 }],
//!     var_bounds: None,
//! };
//!
//! let result = solve(&prob, &SolverSettings::default()).unwrap();
//! assert_eq!(result.status, SolveStatus::Optimal);
//! assert!((result.obj_val + 1.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod linalg;
pub mod problem;
pub mod simplex;

pub use error::{CoreResult, SolveError};
pub use problem::{
    ConeSpec, ProblemData, SolveInfo, SolveResult, SolveStatus, SolverSettings, VarBound,
};

/// Main solve entry point.
///
/// Infeasible and unbounded problems are reported through
/// [`SolveResult::status`]; only malformed input is an error.
pub fn solve(problem: &ProblemData, settings: &SolverSettings) -> CoreResult<SolveResult> {
    simplex::solve_simplex(problem, settings)
}
