//! MIP problem representation.

use super::expr::{Constraint, LinearExpr, VarId, Variable};
use crate::error::{MipError, MipResult};

/// Mixed-integer linear program: maximize `objective` subject to
/// `constraints`, with integrality on integer and binary variables.
///
/// The variable ordering is fixed at construction and shared by every node
/// of the search tree.
#[derive(Debug, Clone)]
pub struct MipProblem {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,

    /// Indices of integer variables (includes binary), in declaration order.
    integer_vars: Vec<usize>,
}

impl MipProblem {
    /// Create a validated problem.
    ///
    /// Fails with [`MipError::InvalidProblem`] when the variable list is
    /// empty, when an expression references an unknown variable, or when a
    /// coefficient, constant or right-hand side is not finite.
    pub fn new(
        variables: Vec<Variable>,
        constraints: Vec<Constraint>,
        objective: LinearExpr,
    ) -> MipResult<Self> {
        if variables.is_empty() {
            return Err(MipError::InvalidProblem("Problem has no variables".to_string()));
        }

        let n = variables.len();
        check_expr(&objective, n, "objective")?;
        for (i, constraint) in constraints.iter().enumerate() {
            let what = format!("constraint {}", i);
            check_expr(&constraint.expr, n, &what)?;
            if !constraint.rhs.is_finite() {
                return Err(MipError::InvalidProblem(format!(
                    "{} has non-finite right-hand side {}",
                    what, constraint.rhs
                )));
            }
        }

        let integer_vars = variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.var_type.is_integer())
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            variables,
            constraints,
            objective,
            integer_vars,
        })
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints of the root problem.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Number of integer variables (including binary).
    pub fn num_integers(&self) -> usize {
        self.integer_vars.len()
    }

    /// Indices of integer variables in declaration order.
    pub fn integer_vars(&self) -> &[usize] {
        &self.integer_vars
    }

    /// Variables in their fixed order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Root constraint set.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Objective to maximize.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Look up a variable by name.
    pub fn var_by_name(&self, name: &str) -> Option<VarId> {
        self.variables.iter().position(|v| v.name == name).map(VarId)
    }

    /// Check every root constraint at `x`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(x, tol))
    }
}

fn check_expr(expr: &LinearExpr, n: usize, what: &str) -> MipResult<()> {
    for &(var, coef) in expr.terms() {
        if var.index() >= n {
            return Err(MipError::InvalidProblem(format!(
                "{} references variable {} but only {} variables exist",
                what, var, n
            )));
        }
        if !coef.is_finite() {
            return Err(MipError::InvalidProblem(format!(
                "{} has non-finite coefficient {} on {}",
                what, coef, var
            )));
        }
    }
    if !expr.offset().is_finite() {
        return Err(MipError::InvalidProblem(format!(
            "{} has non-finite constant {}",
            what,
            expr.offset()
        )));
    }
    Ok(())
}
