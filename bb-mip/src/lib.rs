//! Branch-and-bound search for mixed-integer linear programs.
//!
//! Maximizes a linear objective over variables in a fixed order, some of
//! which must take integer values. Each search node is solved as a
//! continuous relaxation; nodes are fathomed by infeasibility or by bound,
//! integral relaxations update the incumbent, and fractional ones are split
//! on the first fractional variable into a floor child and a ceil child.
//!
//! # Example
//!
//! ```
//! use bb_mip::{solve, Constraint, LinearExpr, MipStatus, VarId, Variable};
//!
//! // max x + y s.t. x + y <= 3.5, x <= 2.5, x, y >= 0, x and y integer
//! let (x, y) = (VarId(0), VarId(1));
//! let sum = LinearExpr::new().term(x, 1.0).term(y, 1.0);
//!
//! let sol = solve(
//!     vec![Variable::integer("x"), Variable::integer("y")],
//!     vec![
//!         Constraint::le(sum.clone(), 3.5),
//!         Constraint::le(LinearExpr::new().term(x, 1.0), 2.5),
//!         Constraint::ge(LinearExpr::new().term(x, 1.0), 0.0),
//!         Constraint::ge(LinearExpr::new().term(y, 1.0), 0.0),
//!     ],
//!     sum,
//! )
//! .unwrap();
//!
//! assert_eq!(sol.status, MipStatus::Optimal);
//! assert!((sol.obj_val.unwrap() - 3.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod master;
pub mod model;
pub mod search;
pub mod settings;

pub use error::{MipError, MipResult};
pub use master::{Relaxation, RelaxationOutcome, RelaxationSolver, SimplexRelaxation};
pub use model::{
    Constraint, LinearExpr, MipProblem, MipSolution, MipStatus, Sense, VarId, VarType, Variable,
};
pub use search::{BranchAndBound, TreeStats};
pub use settings::{MipSettings, NodeSelection, INTEGRALITY_TOLERANCE};

/// Solve `maximize objective` over `variables` subject to `constraints`
/// with default settings.
///
/// Returns [`MipError::InvalidProblem`] for malformed input. A problem
/// without an integral solution is not an error: the result has status
/// [`MipStatus::Infeasible`] and no assignment.
pub fn solve(
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
) -> MipResult<MipSolution> {
    let problem = MipProblem::new(variables, constraints, objective)?;
    solve_mip(&problem, &MipSettings::default())
}

/// Solve a validated problem with the built-in simplex relaxation.
pub fn solve_mip(problem: &MipProblem, settings: &MipSettings) -> MipResult<MipSolution> {
    let mut solver = SimplexRelaxation::new(settings.relaxation_settings.clone());
    solve_with(problem, settings, &mut solver)
}

/// Solve a validated problem with a caller-supplied relaxation solver.
pub fn solve_with<S>(
    problem: &MipProblem,
    settings: &MipSettings,
    solver: &mut S,
) -> MipResult<MipSolution>
where
    S: RelaxationSolver + ?Sized,
{
    if settings.verbose {
        log::info!(
            "Branch-and-bound: {} variables ({} integer), {} constraints, {:?}",
            problem.num_vars(),
            problem.num_integers(),
            problem.num_constraints(),
            settings.node_selection,
        );
    }

    let mut tree = BranchAndBound::new(settings.clone());
    tree.run(problem, solver)
}
