//! Dense linear algebra on `ndarray` matrices, backed by `nalgebra`.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array2;

use crate::error::{Dist2CycleError, Dist2CycleResult};

fn to_dmatrix(matrix: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.dim();
    DMatrix::from_fn(rows, cols, |i, j| matrix[[i, j]])
}

fn from_dmatrix(matrix: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((matrix.nrows(), matrix.ncols()), |(i, j)| matrix[(i, j)])
}

/// Moore–Penrose pseudo-inverse via SVD.
///
/// Singular values below `tolerance` are treated as zero, so the kernel of a
/// singular Laplacian maps to zero instead of blowing up.
pub fn pseudo_inverse(matrix: &Array2<f64>, tolerance: f64) -> Dist2CycleResult<Array2<f64>> {
    let pinv = to_dmatrix(matrix)
        .pseudo_inverse(tolerance)
        .map_err(|e| Dist2CycleError::PseudoInverse(e.to_string()))?;
    Ok(from_dmatrix(&pinv))
}

/// Number of eigenvalues of a symmetric matrix with magnitude below `tolerance`
pub fn nullity(symmetric: &Array2<f64>, tolerance: f64) -> usize {
    if symmetric.is_empty() {
        return 0;
    }
    let eigen = SymmetricEigen::new(to_dmatrix(symmetric));
    eigen
        .eigenvalues
        .iter()
        .filter(|v| v.abs() < tolerance)
        .count()
}
