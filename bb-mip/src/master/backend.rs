//! Relaxation solver trait and outcome types.

use crate::model::MipProblem;
use crate::search::SearchNode;

/// Optimal solution of a node's continuous relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    /// Objective value (maximization sense, constant included).
    pub objective: f64,

    /// One value per problem variable.
    pub values: Vec<f64>,
}

/// Result of solving one node's relaxation.
#[derive(Debug, Clone, PartialEq)]
pub enum RelaxationOutcome {
    /// Relaxation solved to optimality.
    Optimal(Relaxation),

    /// No point satisfies the node's constraints (node can be pruned).
    Infeasible,

    /// Objective unbounded over the node's region.
    Unbounded,

    /// Numerical or iteration failure; the node is pruned like an
    /// infeasible one but reported separately.
    Failed(String),
}

impl RelaxationOutcome {
    /// Shorthand for an optimal outcome.
    pub fn optimal(objective: f64, values: Vec<f64>) -> Self {
        RelaxationOutcome::Optimal(Relaxation { objective, values })
    }
}

/// Solves the continuous relaxation of a search node.
///
/// Each call must be independent of the previous ones: the relaxation is
/// rebuilt from `problem` and `node` so no constraint can leak from one
/// node into another.
pub trait RelaxationSolver {
    /// Solve the relaxation of `problem` restricted to `node`'s constraint set.
    fn solve(&mut self, problem: &MipProblem, node: &SearchNode) -> RelaxationOutcome;
}

impl<F> RelaxationSolver for F
where
    F: FnMut(&MipProblem, &SearchNode) -> RelaxationOutcome,
{
    fn solve(&mut self, problem: &MipProblem, node: &SearchNode) -> RelaxationOutcome {
        self(problem, node)
    }
}
