//! Branching variable selection.
//!
//! The rule is fixed: branch on the first integer variable, in declaration
//! order, whose relaxation value is fractional.

use super::BranchBound;
use crate::model::MipProblem;

/// Whether `value` is within `tol` of an integer.
///
/// The comparison allows a few ulps on top of `tol`, so `k + tol` counts as
/// integral for every representable integer `k` even after rounding in the
/// subtraction. Non-finite values are never integral.
pub fn is_integral_value(value: f64, tol: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let slack = 4.0 * f64::EPSILON * value.abs().max(1.0);
    (value - value.round()).abs() <= tol + slack
}

/// Whether every integer variable of `problem` is integral in `values`.
///
/// Continuous variables are ignored.
pub fn is_integral(problem: &MipProblem, values: &[f64], tol: f64) -> bool {
    first_fractional(problem, values, tol).is_none()
}

/// Index of the first integer variable with a fractional value.
pub fn first_fractional(problem: &MipProblem, values: &[f64], tol: f64) -> Option<usize> {
    problem
        .integer_vars()
        .iter()
        .copied()
        .find(|&j| !is_integral_value(values[j], tol))
}

/// A branching decision.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Current (fractional) value.
    pub value: f64,

    /// Bound for the "down" child (x <= floor(value)).
    pub down: BranchBound,

    /// Bound for the "up" child (x >= ceil(value)).
    pub up: BranchBound,
}

/// Branching variable selector.
#[derive(Debug, Clone, Copy)]
pub struct BranchingSelector {
    tol: f64,
}

impl BranchingSelector {
    /// Create a selector using integrality tolerance `tol`.
    pub fn new(tol: f64) -> Self {
        Self { tol }
    }

    /// Integrality tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tol
    }

    /// Select the branching variable for a relaxation solution.
    ///
    /// Returns None if all integer variables are integral.
    pub fn select(&self, values: &[f64], prob: &MipProblem) -> Option<BranchDecision> {
        let var = first_fractional(prob, values, self.tol)?;
        let value = values[var];
        Some(BranchDecision {
            var,
            value,
            down: BranchBound::floor(var, value),
            up: BranchBound::ceil(var, value),
        })
    }
}
