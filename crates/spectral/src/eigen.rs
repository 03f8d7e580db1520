//! Dense symmetric eigen-decomposition, backed by `linfa-linalg`.

use linfa_linalg::eigh::{EigSort, Eigh};
use ndarray::Array2;
use tracing::debug;

use crate::error::SpectralError;
use crate::laplacian::check_square;

/// Eigenvalues in ascending order with eigenvectors as matching columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricEigen {
    pub values: Vec<f64>,
    pub vectors: Array2<f64>,
}

/// Decompose the symmetric matrix `matrix`.
///
/// Only the symmetric part `(M + M^T) / 2` of the input is used.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> Result<SymmetricEigen, SpectralError> {
    let n = check_square(matrix)?;
    if n == 0 {
        return Ok(SymmetricEigen {
            values: Vec::new(),
            vectors: Array2::zeros((0, 0)),
        });
    }

    let symmetric = (matrix + &matrix.t()) * 0.5;
    let (values, vectors) = symmetric
        .eigh()
        .map_err(|e| SpectralError::Eigen(e.to_string()))?
        .sort_eig_asc();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SpectralError::Eigen("non-finite eigenvalue".into()));
    }
    debug!(n, "eigh_decomposed");

    Ok(SymmetricEigen {
        values: values.to_vec(),
        vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const EPS: f64 = 1e-9;

    fn reconstruct(e: &SymmetricEigen) -> Array2<f64> {
        let n = e.values.len();
        let mut d = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            d[[i, i]] = e.values[i];
        }
        e.vectors.dot(&d).dot(&e.vectors.t())
    }

    #[test]
    fn diagonal_matrix_is_sorted() {
        let m = array![[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
        let e = symmetric_eigen(&m).unwrap();
        for (got, want) in e.values.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < EPS);
        }
        // Eigenvector of the smallest value is +-e_1.
        assert!((e.vectors[[1, 0]].abs() - 1.0).abs() < EPS);
    }

    #[test]
    fn two_by_two_known_spectrum() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let e = symmetric_eigen(&m).unwrap();
        assert!((e.values[0] - 1.0).abs() < EPS);
        assert!((e.values[1] - 3.0).abs() < EPS);
        let r = reconstruct(&e);
        for (x, y) in r.iter().zip(m.iter()) {
            assert!((x - y).abs() < EPS);
        }
    }

    #[test]
    fn eigenvectors_are_orthonormal() {
        let m = array![
            [4.0, 1.0, 0.5, 0.0],
            [1.0, 3.0, 0.2, 0.1],
            [0.5, 0.2, 2.0, 0.7],
            [0.0, 0.1, 0.7, 1.0]
        ];
        let e = symmetric_eigen(&m).unwrap();
        let gram = e.vectors.t().dot(&e.vectors);
        for ((i, j), v) in gram.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((v - expected).abs() < EPS);
        }
        let r = reconstruct(&e);
        for (x, y) in r.iter().zip(m.iter()) {
            assert!((x - y).abs() < EPS);
        }
        assert!(e.values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn asymmetric_input_uses_symmetric_part() {
        let m = array![[2.0, 0.5], [1.5, 2.0]];
        let e = symmetric_eigen(&m).unwrap();
        assert!((e.values[0] - 1.0).abs() < EPS);
        assert!((e.values[1] - 3.0).abs() < EPS);
    }

    #[test]
    fn empty_matrix() {
        let m = Array2::<f64>::zeros((0, 0));
        let e = symmetric_eigen(&m).unwrap();
        assert!(e.values.is_empty());
    }

    #[test]
    fn non_square_is_rejected() {
        let m = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            symmetric_eigen(&m),
            Err(SpectralError::NotSquare { rows: 2, cols: 3 })
        ));
    }
}
