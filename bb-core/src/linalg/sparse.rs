//! Sparse matrix construction and conversion.
//!
//! Constraint matrices are stored in CSC (Compressed Sparse Column) format;
//! the simplex tableau itself is dense.

use nalgebra::DMatrix;
use sprs::TriMat;

use crate::problem::SparseCsc;

/// Build a sparse CSC matrix from triplets (row, col, value).
///
/// Duplicate (row, col) entries are summed.
pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> SparseCsc
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut tri = TriMat::new((nrows, ncols));
    for (i, j, v) in triplets {
        tri.add_triplet(i, j, v);
    }
    tri.to_csc()
}

/// Expand a CSC matrix into a dense matrix of the same shape.
pub fn to_dense(a: &SparseCsc) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(a.rows(), a.cols());
    for (col_idx, col) in a.outer_iterator().enumerate() {
        for (row_idx, &val) in col.iter() {
            dense[(row_idx, col_idx)] += val;
        }
    }
    dense
}

/// Compute y = A x.
pub fn mul_vec(a: &SparseCsc, x: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0; a.rows()];
    for (col_idx, col) in a.outer_iterator().enumerate() {
        let xj = x[col_idx];
        if xj == 0.0 {
            continue;
        }
        for (row_idx, &val) in col.iter() {
            y[row_idx] += val * xj;
        }
    }
    y
}
