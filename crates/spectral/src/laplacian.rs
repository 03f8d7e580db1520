//! Symmetric normalised graph Laplacian of a precomputed affinity matrix.
//!
//! `L = I - D^-1/2 W D^-1/2`, where `W` is the affinity with self-loops
//! removed and `D` its degree diagonal. Isolated nodes (zero degree) get a
//! scaling degree of 1 and a zero diagonal entry, so they contribute a zero
//! eigenvalue of their own.

use ndarray::{Array1, Array2};

use crate::error::SpectralError;

/// Normalised Laplacian plus the degree scaling used to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLaplacian {
    pub matrix: Array2<f64>,
    /// `sqrt(degree)` per node, `1.0` for isolated nodes.
    pub sqrt_degree: Array1<f64>,
    pub isolated: Vec<bool>,
}

/// Reject non-square or non-finite matrices; returns the side length.
pub(crate) fn check_square(matrix: &Array2<f64>) -> Result<usize, SpectralError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(SpectralError::NotSquare { rows, cols });
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(SpectralError::NonFinite);
    }
    Ok(rows)
}

/// Build the normalised Laplacian of `affinity`.
///
/// The input is symmetrised as `(A + A^T) / 2` and negative weights are
/// treated as absent edges.
pub fn normalized_laplacian(affinity: &Array2<f64>) -> Result<NormalizedLaplacian, SpectralError> {
    let n = check_square(affinity)?;

    let mut weights = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let w = (0.5 * (affinity[[i, j]] + affinity[[j, i]])).max(0.0);
            weights[[i, j]] = w;
            weights[[j, i]] = w;
        }
    }

    let degree = weights.sum_axis(ndarray::Axis(1));
    let isolated: Vec<bool> = degree.iter().map(|d| *d <= 0.0).collect();
    let sqrt_degree = degree.mapv(|d| if d > 0.0 { d.sqrt() } else { 1.0 });

    let mut matrix = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        matrix[[i, i]] = if isolated[i] { 0.0 } else { 1.0 };
        for j in 0..n {
            if i != j && weights[[i, j]] != 0.0 {
                matrix[[i, j]] = -weights[[i, j]] / (sqrt_degree[i] * sqrt_degree[j]);
            }
        }
    }

    Ok(NormalizedLaplacian {
        matrix,
        sqrt_degree,
        isolated,
    })
}
