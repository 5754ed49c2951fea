//! Problem data structures and validation.
//!
//! This module defines the canonical linear program handed to the simplex
//! engine and the types it returns.

use std::fmt;

use crate::error::{CoreResult, SolveError};

/// Sparse matrix in CSC format.
pub type SparseCsc = sprs::CsMatI<f64, usize>;

/// Linear program in canonical form.
///
/// The engine works with the formulation:
///
/// ```text
/// minimize    q^T x
/// subject to  A x + s = b
///             s ∈ K
///             lb <= x <= ub   (optional, per variable)
/// ```
///
/// where K is a Cartesian product of `Zero` and `NonNeg` cones laid out
/// in row order.
///
/// # Dimensions
///
/// - `n`: number of variables (length of x and q)
/// - `m`: number of constraint rows (length of b, rows of A)
#[derive(Debug, Clone)]
#[allow(non_snake_case)] // A is standard mathematical notation
pub struct ProblemData {
    /// Linear cost vector q (length n)
    pub q: Vec<f64>,

    /// Constraint matrix A (m × n, CSC format)
    pub A: SparseCsc,

    /// Constraint right-hand side b (length m)
    pub b: Vec<f64>,

    /// Cone specifications partitioning the m rows
    pub cones: Vec<ConeSpec>,

    /// Optional variable bounds; variables without an entry are free
    pub var_bounds: Option<Vec<VarBound>>,
}

/// Cone specification for a block of consecutive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ConeSpec {
    /// Zero cone: {0}^dim (equality rows).
    Zero { dim: usize },

    /// Nonnegative orthant: rows with `a^T x <= b`.
    NonNeg { dim: usize },
}

impl ConeSpec {
    /// Number of rows covered by this cone.
    pub fn dim(&self) -> usize {
        match *self {
            ConeSpec::Zero { dim } | ConeSpec::NonNeg { dim } => dim,
        }
    }
}

/// Variable bound specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarBound {
    /// Variable index
    pub var: usize,
    /// Lower bound (None = -∞)
    pub lower: Option<f64>,
    /// Upper bound (None = +∞)
    pub upper: Option<f64>,
}

/// Simplex settings.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    /// Maximum number of pivots across both phases
    pub max_iter: usize,

    /// Phase 1 residual below which the problem counts as feasible
    pub tol_feas: f64,

    /// Smallest magnitude accepted as a pivot element or reduced cost
    pub tol_pivot: f64,

    /// Emit per-solve trace output
    pub verbose: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            tol_feas: 1e-8,
            tol_pivot: 1e-9,
            verbose: false,
        }
    }
}

/// Solution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found
    Optimal,

    /// No point satisfies the constraints
    PrimalInfeasible,

    /// Objective decreases without bound over the feasible region
    Unbounded,

    /// Pivot budget exhausted
    MaxIters,

    /// Non-finite values appeared in the tableau
    NumericalError,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::PrimalInfeasible => write!(f, "Primal Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
            SolveStatus::MaxIters => write!(f, "MaxIters"),
            SolveStatus::NumericalError => write!(f, "Numerical Error"),
        }
    }
}

/// Solve result with solution and diagnostics.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Solution status
    pub status: SolveStatus,

    /// Primal solution x (length n, empty unless optimal)
    pub x: Vec<f64>,

    /// Row slacks s = b - A x (length m, empty unless optimal)
    pub s: Vec<f64>,

    /// Objective value q^T x (NaN unless optimal)
    pub obj_val: f64,

    /// Solve diagnostics
    pub info: SolveInfo,
}

impl SolveResult {
    pub(crate) fn without_solution(status: SolveStatus, info: SolveInfo) -> Self {
        Self {
            status,
            x: Vec::new(),
            s: Vec::new(),
            obj_val: f64::NAN,
            info,
        }
    }
}

/// Solve diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveInfo {
    /// Pivots performed in phase 1 and phase 2 combined
    pub iters: usize,

    /// Total solve time (milliseconds)
    pub solve_time_ms: u64,
}

impl ProblemData {
    /// Get the number of variables (n)
    pub fn num_vars(&self) -> usize {
        self.q.len()
    }

    /// Get the number of constraint rows (m)
    pub fn num_constraints(&self) -> usize {
        self.b.len()
    }

    /// Tightest (lower, upper) bound per variable.
    ///
    /// Repeated entries for the same variable are intersected.
    pub fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.num_vars();
        let mut lower = vec![f64::NEG_INFINITY; n];
        let mut upper = vec![f64::INFINITY; n];

        if let Some(ref bounds) = self.var_bounds {
            for bound in bounds {
                if let Some(l) = bound.lower {
                    lower[bound.var] = lower[bound.var].max(l);
                }
                if let Some(u) = bound.upper {
                    upper[bound.var] = upper[bound.var].min(u);
                }
            }
        }

        (lower, upper)
    }

    /// Validate problem dimensions, cone partitioning and finiteness.
    pub fn validate(&self) -> CoreResult<()> {
        let n = self.num_vars();
        let m = self.num_constraints();

        if self.A.rows() != m {
            return Err(SolveError::InvalidProblem(format!(
                "A has {} rows, expected {}",
                self.A.rows(),
                m
            )));
        }
        if self.A.cols() != n {
            return Err(SolveError::InvalidProblem(format!(
                "A has {} cols, expected {}",
                self.A.cols(),
                n
            )));
        }

        let cone_total_dim: usize = self.cones.iter().map(ConeSpec::dim).sum();
        if cone_total_dim != m {
            return Err(SolveError::InvalidProblem(format!(
                "Cone dimensions sum to {}, expected {}",
                cone_total_dim, m
            )));
        }

        if self.q.iter().chain(&self.b).any(|v| !v.is_finite())
            || self.A.data().iter().any(|v| !v.is_finite())
        {
            return Err(SolveError::InvalidProblem(
                "q, A and b must be finite".to_string(),
            ));
        }

        if let Some(ref bounds) = self.var_bounds {
            for bound in bounds {
                if bound.var >= n {
                    return Err(SolveError::InvalidProblem(format!(
                        "Bound on variable {} out of range (n={})",
                        bound.var, n
                    )));
                }
                if bound.lower.is_some_and(f64::is_nan) || bound.upper.is_some_and(f64::is_nan) {
                    return Err(SolveError::InvalidProblem(format!(
                        "Variable {} has a NaN bound",
                        bound.var
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::sparse;

    fn one_row() -> ProblemData {
        ProblemData {
            q: vec![1.0, 1.0],
            A: sparse::from_triplets(1, 2, vec![(0, 0, 1.0), (0, 1, 1.0)]),
            b: vec![1.0],
            cones: vec![ConeSpec::NonNeg { dim: 1 }],
            var_bounds: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(one_row().validate().is_ok());
    }

    #[test]
    fn test_validate_cone_mismatch() {
        let mut prob = one_row();
        prob.cones = vec![ConeSpec::NonNeg { dim: 2 }];
        assert!(prob.validate().is_err());
    }

    #[test]
    fn test_validate_bound_out_of_range() {
        let mut prob = one_row();
        prob.var_bounds = Some(vec![VarBound { var: 5, lower: Some(0.0), upper: None }]);
        assert!(prob.validate().is_err());
    }

    #[test]
    fn test_validate_non_finite() {
        let mut prob = one_row();
        prob.b[0] = f64::INFINITY;
        assert!(prob.validate().is_err());
    }

    #[test]
    fn test_bounds_intersect() {
        let mut prob = one_row();
        prob.var_bounds = Some(vec![
            VarBound { var: 0, lower: Some(0.0), upper: Some(5.0) },
            VarBound { var: 0, lower: Some(1.0), upper: Some(7.0) },
        ]);

        let (lower, upper) = prob.bounds();
        assert_eq!(lower, vec![1.0, f64::NEG_INFINITY]);
        assert_eq!(upper, vec![5.0, f64::INFINITY]);
    }
}
