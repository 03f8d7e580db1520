//! Spectral embedding of documents from their affinity graph.
//!
//! The decomposition is done once per affinity matrix; the first `k`
//! eigenvectors for any candidate `k` are then sliced out of it.

use std::time::Instant;

use ndarray::{Array1, Array2};
use tracing::info;

use crate::eigen::symmetric_eigen;
use crate::error::SpectralError;
use crate::laplacian::normalized_laplacian;

/// Eigen-decomposed normalised Laplacian of one affinity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralEmbedding {
    eigenvalues: Vec<f64>,
    eigenvectors: Array2<f64>,
    sqrt_degree: Array1<f64>,
}

impl SpectralEmbedding {
    /// Build the Laplacian of `affinity` and decompose it.
    pub fn compute(affinity: &Array2<f64>) -> Result<Self, SpectralError> {
        let start = Instant::now();
        let laplacian = normalized_laplacian(affinity)?;
        let eigen = symmetric_eigen(&laplacian.matrix)?;
        info!(
            documents = affinity.nrows(),
            isolated = laplacian.isolated.iter().filter(|i| **i).count(),
            elapsed_micros = start.elapsed().as_micros(),
            "spectral_embedding_computed"
        );
        Ok(Self {
            eigenvalues: eigen.values,
            eigenvectors: eigen.vectors,
            sqrt_degree: laplacian.sqrt_degree,
        })
    }

    /// Number of embedded documents.
    pub fn len(&self) -> usize {
        self.sqrt_degree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Laplacian eigenvalues, ascending.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// `n x k` embedding: the `k` eigenvectors with the smallest
    /// eigenvalues, each scaled by `1/sqrt(degree)` and sign-normalised so
    /// its largest-magnitude entry is positive.
    ///
    /// `k` is capped at the number of documents.
    pub fn rows(&self, k: usize) -> Array2<f64> {
        let n = self.len();
        let k = k.min(n);
        let mut out = Array2::<f64>::zeros((n, k));
        for c in 0..k {
            let mut col = &self.eigenvectors.column(c) / &self.sqrt_degree;
            let mut pivot = 0usize;
            for (i, v) in col.iter().enumerate() {
                if v.abs() > col[pivot].abs() {
                    pivot = i;
                }
            }
            if n > 0 && col[pivot] < 0.0 {
                col.mapv_inplace(|v| -v);
            }
            out.column_mut(c).assign(&col);
        }
        out
    }
}
