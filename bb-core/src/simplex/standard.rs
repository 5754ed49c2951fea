//! Conversion from canonical form to simplex standard form.
//!
//! ```text
//! minimize    c^T y + c0
//! subject to  A' y = b',  b' >= 0
//!             y >= 0
//! ```
//!
//! Each original variable maps to one or two nonnegative columns:
//! - finite lower bound: `x = lb + y`
//! - only an upper bound: `x = ub - y`
//! - free: `x = y+ - y-`
//!
//! `NonNeg` rows and finite upper bounds on shifted variables get a slack
//! column each.

use nalgebra::DMatrix;

use crate::linalg::sparse;
use crate::problem::{ConeSpec, ProblemData};

/// How one original variable is recovered from standard-form columns.
#[derive(Debug, Clone)]
pub(crate) struct VarMap {
    offset: f64,
    cols: Vec<(usize, f64)>,
}

impl VarMap {
    fn value(&self, y: &[f64]) -> f64 {
        self.offset + self.cols.iter().map(|&(col, sign)| sign * y[col]).sum::<f64>()
    }
}

/// A linear program in standard form.
#[derive(Debug, Clone)]
pub(crate) struct StandardForm {
    /// Equality matrix (rows × columns)
    pub a: DMatrix<f64>,

    /// Nonnegative right-hand side
    pub b: Vec<f64>,

    /// Cost per column
    pub c: Vec<f64>,

    var_maps: Vec<VarMap>,
}

impl StandardForm {
    /// Build the standard form of `prob`.
    ///
    /// Returns `None` when some variable has a lower bound above its upper
    /// bound, which makes the problem infeasible before any pivoting.
    pub fn from_problem(prob: &ProblemData) -> Option<Self> {
        let n = prob.num_vars();
        let m = prob.num_constraints();
        let (lower, upper) = prob.bounds();

        // Structural columns
        let mut var_maps = Vec::with_capacity(n);
        let mut bound_rows: Vec<(usize, f64)> = Vec::new();
        let mut n_struct = 0;
        for j in 0..n {
            let (lb, ub) = (lower[j], upper[j]);
            if lb > ub {
                return None;
            }
            let map = if lb.is_finite() {
                if ub.is_finite() {
                    bound_rows.push((n_struct, ub - lb));
                }
                VarMap { offset: lb, cols: vec![(n_struct, 1.0)] }
            } else if ub.is_finite() {
                VarMap { offset: ub, cols: vec![(n_struct, -1.0)] }
            } else {
                n_struct += 1;
                VarMap { offset: 0.0, cols: vec![(n_struct - 1, 1.0), (n_struct, -1.0)] }
            };
            n_struct += 1;
            var_maps.push(map);
        }

        let mut row_is_ineq = Vec::with_capacity(m);
        for cone in &prob.cones {
            let ineq = matches!(cone, ConeSpec::NonNeg { .. });
            row_is_ineq.extend(std::iter::repeat(ineq).take(cone.dim()));
        }

        let n_slack = row_is_ineq.iter().filter(|&&ineq| ineq).count() + bound_rows.len();
        let rows = m + bound_rows.len();
        let cols = n_struct + n_slack;

        let dense = sparse::to_dense(&prob.A);
        let mut a = DMatrix::zeros(rows, cols);
        let mut b = vec![0.0; rows];
        let mut next_slack = n_struct;

        for i in 0..m {
            let mut rhs = prob.b[i];
            for (j, map) in var_maps.iter().enumerate() {
                let aij = dense[(i, j)];
                if aij == 0.0 {
                    continue;
                }
                rhs -= aij * map.offset;
                for &(col, sign) in &map.cols {
                    a[(i, col)] += aij * sign;
                }
            }
            if row_is_ineq[i] {
                a[(i, next_slack)] = 1.0;
                next_slack += 1;
            }
            b[i] = rhs;
        }

        for (k, &(col, width)) in bound_rows.iter().enumerate() {
            let row = m + k;
            a[(row, col)] = 1.0;
            a[(row, next_slack)] = 1.0;
            next_slack += 1;
            b[row] = width;
        }

        for i in 0..rows {
            if b[i] < 0.0 {
                b[i] = -b[i];
                for j in 0..cols {
                    a[(i, j)] = -a[(i, j)];
                }
            }
        }

        let mut c = vec![0.0; cols];
        for (j, map) in var_maps.iter().enumerate() {
            for &(col, sign) in &map.cols {
                c[col] += prob.q[j] * sign;
            }
        }

        Some(Self { a, b, c, var_maps })
    }

    /// Number of equality rows.
    pub fn num_rows(&self) -> usize {
        self.a.nrows()
    }

    /// Number of nonnegative columns.
    pub fn num_cols(&self) -> usize {
        self.a.ncols()
    }

    /// Map a standard-form point back to the original variables.
    pub fn recover(&self, y: &[f64]) -> Vec<f64> {
        self.var_maps.iter().map(|map| map.value(y)).collect()
    }
}
