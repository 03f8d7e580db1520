//! Pairwise cosine affinity and distance over feature rows.

use std::time::Instant;

use ndarray::Array2;
use rayon::prelude::*;
use tracing::info;

use crate::config::SimilarityConfig;
use crate::matrix::FeatureMatrix;

/// Dense affinity and distance matrices derived from one [`FeatureMatrix`].
///
/// Both are `n x n`, row/column aligned with the feature rows, and exactly
/// symmetric (the upper triangle is computed and mirrored).
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrices {
    /// Cosine similarity; `0` whenever either row has zero norm, including
    /// the diagonal cell of an all-zero row.
    pub affinity: Array2<f64>,
    /// `1 - affinity`, clamped to `[0, 2]`, with a zero diagonal.
    pub distance: Array2<f64>,
}

impl SimilarityMatrices {
    pub fn len(&self) -> usize {
        self.affinity.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cosine similarity of rows `i` and `j` given precomputed norms.
#[inline]
fn cosine(matrix: &FeatureMatrix, norms: &[f64], i: usize, j: usize) -> f64 {
    let denom = norms[i] * norms[j];
    if denom == 0.0 {
        return 0.0;
    }
    match (matrix.row(i), matrix.row(j)) {
        (Some(a), Some(b)) => (a.dot(&b) / denom).clamp(-1.0, 1.0),
        _ => 0.0,
    }
}

/// Upper-triangle cells `(i, i..n)` of one affinity row.
fn upper_row(matrix: &FeatureMatrix, norms: &[f64], i: usize) -> Vec<f64> {
    (i..matrix.n_rows())
        .map(|j| cosine(matrix, norms, i, j))
        .collect()
}

/// Compute the affinity and distance matrices for every pair of rows.
pub fn compute_similarity(matrix: &FeatureMatrix, cfg: &SimilarityConfig) -> SimilarityMatrices {
    let start = Instant::now();
    let n = matrix.n_rows();
    let norms: Vec<f64> = (0..n)
        .map(|d| {
            matrix
                .row(d)
                .map_or(0.0, |row| row.data().iter().map(|v| v * v).sum::<f64>().sqrt())
        })
        .collect();

    let rows: Vec<Vec<f64>> = if cfg.use_parallel {
        (0..n)
            .into_par_iter()
            .map(|i| upper_row(matrix, &norms, i))
            .collect()
    } else {
        (0..n).map(|i| upper_row(matrix, &norms, i)).collect()
    };

    let mut affinity = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (offset, value) in row.into_iter().enumerate() {
            let j = i + offset;
            affinity[[i, j]] = value;
            affinity[[j, i]] = value;
        }
    }
    let mut distance = affinity.mapv(|s: f64| (1.0 - s).clamp(0.0, 2.0));
    // Self-distance is zero even for rows without features.
    distance.diag_mut().fill(0.0);

    let zero_norm = norms.iter().filter(|n| **n == 0.0).count();
    info!(
        documents = n,
        zero_norm_rows = zero_norm,
        parallel = cfg.use_parallel,
        elapsed_micros = start.elapsed().as_micros(),
        "similarity_computed"
    );
    SimilarityMatrices { affinity, distance }
}
