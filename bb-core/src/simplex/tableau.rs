//! Dense simplex tableau.
//!
//! Layout: rows `0..m` hold `[A' | I | b']`, row `m` holds reduced costs with
//! the negated objective value in the last column. Columns `0..n` are the
//! standard-form columns, `n..n + m` the phase 1 artificials.

use nalgebra::DMatrix;

use super::standard::StandardForm;

/// Entries smaller than this are flushed to zero after a pivot.
const ZERO_CLAMP: f64 = 1e-12;

/// Outcome of one simplex phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseOutcome {
    Optimal,
    Unbounded,
    MaxIters,
    NumericalError,
}

pub(crate) struct Tableau {
    t: DMatrix<f64>,
    basis: Vec<usize>,
    n: usize,
    tol_pivot: f64,
    iters: usize,
}

impl Tableau {
    /// Tableau with every artificial basic.
    pub fn new(sf: &StandardForm, tol_pivot: f64) -> Self {
        let m = sf.num_rows();
        let n = sf.num_cols();
        let mut t = DMatrix::zeros(m + 1, n + m + 1);

        for i in 0..m {
            for j in 0..n {
                t[(i, j)] = sf.a[(i, j)];
            }
            t[(i, n + i)] = 1.0;
            t[(i, n + m)] = sf.b[i];
        }

        Self {
            t,
            basis: (n..n + m).collect(),
            n,
            tol_pivot,
            iters: 0,
        }
    }

    fn num_rows(&self) -> usize {
        self.basis.len()
    }

    fn rhs_col(&self) -> usize {
        self.t.ncols() - 1
    }

    /// Pivots performed so far.
    pub fn iters(&self) -> usize {
        self.iters
    }

    /// Current objective value.
    pub fn objective(&self) -> f64 {
        -self.t[(self.num_rows(), self.rhs_col())]
    }

    /// Install a cost vector (one entry per tableau column) and price it out
    /// against the current basis.
    pub fn set_objective(&mut self, costs: &[f64]) {
        let m = self.num_rows();
        let rhs = self.rhs_col();

        for j in 0..=rhs {
            let base = if j < rhs { costs[j] } else { 0.0 };
            let priced: f64 = (0..m).map(|i| costs[self.basis[i]] * self.t[(i, j)]).sum();
            self.t[(m, j)] = base - priced;
        }
    }

    /// Phase 1 costs: one per artificial.
    pub fn phase1_costs(&self) -> Vec<f64> {
        let mut costs = vec![0.0; self.rhs_col()];
        for c in &mut costs[self.n..] {
            *c = 1.0;
        }
        costs
    }

    /// Phase 2 costs: the standard-form costs, zero on artificials.
    pub fn phase2_costs(&self, c: &[f64]) -> Vec<f64> {
        let mut costs = vec![0.0; self.rhs_col()];
        costs[..self.n].copy_from_slice(c);
        costs
    }

    /// Run primal simplex with Bland's rule until optimal or stuck.
    ///
    /// With `structural_only`, artificial columns may not enter the basis.
    pub fn run(&mut self, structural_only: bool, max_iter: usize) -> PhaseOutcome {
        let m = self.num_rows();
        let rhs = self.rhs_col();
        let last_col = if structural_only { self.n } else { rhs };

        loop {
            let Some(entering) = (0..last_col).find(|&j| self.t[(m, j)] < -self.tol_pivot) else {
                return PhaseOutcome::Optimal;
            };

            if self.iters >= max_iter {
                return PhaseOutcome::MaxIters;
            }

            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..m {
                let coef = self.t[(i, entering)];
                if coef <= self.tol_pivot {
                    continue;
                }
                let ratio = self.t[(i, rhs)] / coef;
                leaving = match leaving {
                    Some((row, best))
                        if ratio > best + ZERO_CLAMP
                            || (ratio >= best - ZERO_CLAMP && self.basis[row] < self.basis[i]) =>
                    {
                        Some((row, best))
                    }
                    _ => Some((i, ratio)),
                };
            }

            let Some((row, _)) = leaving else {
                return PhaseOutcome::Unbounded;
            };

            self.pivot(row, entering);

            if !self.t[(m, rhs)].is_finite() {
                return PhaseOutcome::NumericalError;
            }
        }
    }

    /// Pivot every basic artificial out of the basis where a structural
    /// column allows it. Rows with no structural entry are redundant and
    /// keep their artificial at zero.
    pub fn drive_out_artificials(&mut self) {
        for row in 0..self.num_rows() {
            if self.basis[row] < self.n {
                continue;
            }
            if let Some(col) = (0..self.n).find(|&j| self.t[(row, j)].abs() > self.tol_pivot) {
                self.pivot(row, col);
            }
        }
    }

    /// Values of the standard-form columns at the current basis.
    pub fn primal(&self) -> Vec<f64> {
        let rhs = self.rhs_col();
        let mut y = vec![0.0; self.n];
        for (i, &col) in self.basis.iter().enumerate() {
            if col < self.n {
                y[col] = self.t[(i, rhs)].max(0.0);
            }
        }
        y
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let ncols = self.t.ncols();
        let p = self.t[(row, col)];

        for j in 0..ncols {
            self.t[(row, j)] /= p;
        }
        self.t[(row, col)] = 1.0;

        for i in 0..self.t.nrows() {
            if i == row {
                continue;
            }
            let f = self.t[(i, col)];
            if f == 0.0 {
                continue;
            }
            for j in 0..ncols {
                let v = self.t[(i, j)] - f * self.t[(row, j)];
                self.t[(i, j)] = if v.abs() < ZERO_CLAMP { 0.0 } else { v };
            }
            self.t[(i, col)] = 0.0;
        }

        self.basis[row] = col;
        self.iters += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::sparse;
    use crate::problem::{ConeSpec, ProblemData, VarBound};

    fn nonneg_problem(q: Vec<f64>, rows: Vec<Vec<f64>>, b: Vec<f64>) -> StandardForm {
        let n = q.len();
        let m = rows.len();
        let triplets = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &v)| (i, j, v)));
        let prob = ProblemData {
            q,
            A: sparse::from_triplets(m, n, triplets),
            b,
            cones: vec![ConeSpec::NonNeg { dim: m }],
            var_bounds: Some(
                (0..n).map(|var| VarBound { var, lower: Some(0.0), upper: None }).collect(),
            ),
        };
        StandardForm::from_problem(&prob).unwrap()
    }

    #[test]
    fn test_phase1_feasible_origin() {
        let sf = nonneg_problem(vec![-1.0], vec![vec![1.0]], vec![4.0]);
        let mut tab = Tableau::new(&sf, 1e-9);

        let costs = tab.phase1_costs();
        tab.set_objective(&costs);
        assert_eq!(tab.objective(), 4.0);

        assert_eq!(tab.run(false, 100), PhaseOutcome::Optimal);
        assert!(tab.objective().abs() < 1e-12);
    }

    #[test]
    fn test_two_phases() {
        // min -x0 - x1 s.t. x0 + 2 x1 <= 4, 3 x0 + x1 <= 6
        // Optimum at (1.6, 1.2), objective -2.8
        let sf = nonneg_problem(
            vec![-1.0, -1.0],
            vec![vec![1.0, 2.0], vec![3.0, 1.0]],
            vec![4.0, 6.0],
        );
        let mut tab = Tableau::new(&sf, 1e-9);

        let costs = tab.phase1_costs();
        tab.set_objective(&costs);
        assert_eq!(tab.run(false, 100), PhaseOutcome::Optimal);
        tab.drive_out_artificials();

        let costs = tab.phase2_costs(&sf.c);
        tab.set_objective(&costs);
        assert_eq!(tab.run(true, 100), PhaseOutcome::Optimal);

        assert!((tab.objective() + 2.8).abs() < 1e-9);
        let x = sf.recover(&tab.primal());
        assert!((x[0] - 1.6).abs() < 1e-9);
        assert!((x[1] - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_unbounded_direction() {
        // min -x0 s.t. x0 - x1 <= 1
        let sf = nonneg_problem(vec![-1.0, 0.0], vec![vec![1.0, -1.0]], vec![1.0]);
        let mut tab = Tableau::new(&sf, 1e-9);

        let costs = tab.phase1_costs();
        tab.set_objective(&costs);
        assert_eq!(tab.run(false, 100), PhaseOutcome::Optimal);
        tab.drive_out_artificials();

        let costs = tab.phase2_costs(&sf.c);
        tab.set_objective(&costs);
        assert_eq!(tab.run(true, 100), PhaseOutcome::Unbounded);
    }

    #[test]
    fn test_iteration_cap() {
        let sf = nonneg_problem(
            vec![-1.0, -1.0],
            vec![vec![1.0, 2.0], vec![3.0, 1.0]],
            vec![4.0, 6.0],
        );
        let mut tab = Tableau::new(&sf, 1e-9);

        let costs = tab.phase2_costs(&sf.c);
        tab.set_objective(&costs);
        assert_eq!(tab.run(false, 0), PhaseOutcome::MaxIters);
    }
}
