//! Silhouette widths over a precomputed distance matrix.

use ndarray::Array2;

use crate::error::SpectralError;

fn check_aligned(distance: &Array2<f64>, n: usize) -> Result<(), SpectralError> {
    let (rows, cols) = distance.dim();
    if rows != n || cols != n {
        return Err(SpectralError::Misaligned {
            rows,
            cols,
            expected: n,
        });
    }
    Ok(())
}

/// Per-document silhouette `s(i) = (b - a) / max(a, b)`.
///
/// `a` is the mean distance to the other members of the document's own
/// cluster, `b` the smallest mean distance to any other cluster. Members of
/// singleton clusters score 0, as does any document with `max(a, b) == 0`.
/// Distances are read as `(d[i][j] + d[j][i]) / 2`.
pub fn silhouette_samples(
    distance: &Array2<f64>,
    labels: &[usize],
) -> Result<Vec<f64>, SpectralError> {
    let n = labels.len();
    check_aligned(distance, n)?;

    let n_labels = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut sizes = vec![0usize; n_labels];
    for &l in labels {
        sizes[l] += 1;
    }
    let found = sizes.iter().filter(|s| **s > 0).count();
    if found < 2 {
        return Err(SpectralError::TooFewClusters { found });
    }

    let mut scores = Vec::with_capacity(n);
    let mut sums = vec![0.0f64; n_labels];
    for i in 0..n {
        let own = labels[i];
        if sizes[own] <= 1 {
            scores.push(0.0);
            continue;
        }
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[labels[j]] += 0.5 * (distance[[i, j]] + distance[[j, i]]);
            }
        }
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = sums
            .iter()
            .zip(sizes.iter())
            .enumerate()
            .filter(|(c, (_, size))| *c != own && **size > 0)
            .map(|(_, (sum, size))| sum / *size as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        scores.push(if denom > 0.0 { (b - a) / denom } else { 0.0 });
    }
    Ok(scores)
}

/// Mean silhouette width over all documents.
pub fn silhouette_score(distance: &Array2<f64>, labels: &[usize]) -> Result<f64, SpectralError> {
    let samples = silhouette_samples(distance, labels)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}
