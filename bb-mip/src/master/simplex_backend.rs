//! Relaxation backend using the bb-core simplex.
//!
//! Every call assembles a fresh LP from the node's flattened constraint set:
//!
//! ```text
//! min  -c^T x
//! s.t. A_eq x + s = b_eq,   s = 0
//!      A_ineq x + s = b_ineq, s >= 0   (>= rows negated)
//!      0 <= x_j <= 1                   (binary variables)
//! ```

use bb_core::{solve, ConeSpec, ProblemData, SolveStatus, SolverSettings, VarBound};
use sprs::TriMat;

use super::{RelaxationOutcome, RelaxationSolver};
use crate::error::MipResult;
use crate::model::{Constraint, MipProblem, Sense, VarType};
use crate::search::SearchNode;

/// Relaxation solver backed by the dense simplex of `bb-core`.
#[derive(Debug, Clone, Default)]
pub struct SimplexRelaxation {
    /// Solver settings.
    settings: SolverSettings,
}

impl SimplexRelaxation {
    /// Create a backend with the given simplex settings.
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Build the LP relaxation of `problem` restricted to `node`.
    ///
    /// Equality rows come first so that a single `Zero` cone followed by a
    /// single `NonNeg` cone partitions the rows.
    pub fn build_problem(problem: &MipProblem, node: &SearchNode) -> MipResult<ProblemData> {
        let n = problem.num_vars();
        let constraints = node.constraints(problem);

        let (eq_rows, ineq_rows): (Vec<&Constraint>, Vec<&Constraint>) =
            constraints.iter().partition(|c| c.sense == Sense::Eq);

        let m = constraints.len();
        let mut triplets: TriMat<f64> = TriMat::new((m, n));
        let mut b = Vec::with_capacity(m);

        for (row, c) in eq_rows.iter().chain(&ineq_rows).enumerate() {
            // a^T x + k >= r  <=>  -a^T x <= k - r
            let sign = if c.sense == Sense::Ge { -1.0 } else { 1.0 };
            for &(var, coef) in c.expr.terms() {
                triplets.add_triplet(row, var.index(), sign * coef);
            }
            b.push(sign * (c.rhs - c.expr.offset()));
        }

        let mut cones = Vec::new();
        if !eq_rows.is_empty() {
            cones.push(ConeSpec::Zero { dim: eq_rows.len() });
        }
        if !ineq_rows.is_empty() {
            cones.push(ConeSpec::NonNeg { dim: ineq_rows.len() });
        }

        // Core minimizes; duplicate objective terms are summed
        let mut q = vec![0.0; n];
        for &(var, coef) in problem.objective().terms() {
            q[var.index()] -= coef;
        }

        let binary_bounds: Vec<VarBound> = problem
            .variables()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.var_type == VarType::Binary)
            .map(|(var, _)| VarBound { var, lower: Some(0.0), upper: Some(1.0) })
            .collect();
        let var_bounds = if binary_bounds.is_empty() { None } else { Some(binary_bounds) };

        let lp = ProblemData {
            q,
            A: triplets.to_csc(),
            b,
            cones,
            var_bounds,
        };
        lp.validate()?;
        Ok(lp)
    }
}

impl RelaxationSolver for SimplexRelaxation {
    fn solve(&mut self, problem: &MipProblem, node: &SearchNode) -> RelaxationOutcome {
        let lp = match Self::build_problem(problem, node) {
            Ok(lp) => lp,
            Err(err) => return RelaxationOutcome::Failed(err.to_string()),
        };

        match solve(&lp, &self.settings) {
            Ok(result) => match result.status {
                SolveStatus::Optimal => RelaxationOutcome::optimal(
                    problem.objective().offset() - result.obj_val,
                    result.x,
                ),
                SolveStatus::PrimalInfeasible => RelaxationOutcome::Infeasible,
                SolveStatus::Unbounded => RelaxationOutcome::Unbounded,
                status => RelaxationOutcome::Failed(format!(
                    "simplex stopped with {} after {} pivots",
                    status, result.info.iters
                )),
            },
            Err(err) => RelaxationOutcome::Failed(err.to_string()),
        }
    }
}
