//! Ordinary least squares via singular value decomposition
//!
//! SVD handles rank-deficient design matrices (constant feature columns
//! standardize to all-zero), returning the minimum-norm solution the same
//! way numpy's lstsq does.

use nalgebra::{DMatrix, DVector};

use crate::error::{PredictionError, Result};

const SVD_EPS: f64 = 1e-12;

/// Fit `y ≈ X·coef + intercept` and return `(coefficients, intercept)`.
pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<(Vec<f64>, f64)> {
    let n = rows.len();
    let p = rows.first().map(Vec::len).unwrap_or(0);
    debug_assert_eq!(n, targets.len());

    // design matrix with a trailing intercept column of ones
    let mut data = Vec::with_capacity(n * (p + 1));
    for row in rows {
        data.extend_from_slice(row);
        data.push(1.0);
    }
    let x = DMatrix::from_row_slice(n, p + 1, &data);
    let y = DVector::from_column_slice(targets);

    let beta = x
        .svd(true, true)
        .solve(&y, SVD_EPS)
        .map_err(|_| PredictionError::SingularSystem)?;

    let coefficients = beta.as_slice()[..p].to_vec();
    let intercept = beta[p];
    Ok((coefficients, intercept))
}
