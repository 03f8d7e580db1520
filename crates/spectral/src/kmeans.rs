//! Seeded k-means over embedded points.
//!
//! Thin wrapper over `linfa-clustering`: k-means++ initialisation,
//! `n_init` restarts keeping the lowest inertia, and a `ChaCha8Rng` seeded
//! from the config so equal inputs give equal labels.

use linfa::traits::{Fit, PredictInplace};
use linfa::DatasetBase;
use linfa_clustering::{KMeans, KMeansInit};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SpectralConfig;
use crate::error::SpectralError;

/// Outcome of one k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centers: Array2<f64>,
    /// Inertia of the retained run, as reported by the fitted model.
    pub inertia: f64,
}

/// Cluster the rows of `points` into `k` groups.
///
/// The RNG is seeded from `cfg.seed` on every call. The caller guarantees
/// `1 <= k <= points.nrows()`.
pub fn kmeans(
    points: &Array2<f64>,
    k: usize,
    cfg: &SpectralConfig,
) -> Result<KMeansFit, SpectralError> {
    let rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let dataset = DatasetBase::from(points.clone());
    let model = KMeans::params_with_rng(k, rng)
        .n_runs(cfg.n_init)
        .max_n_iterations(cfg.max_iter as u64)
        .tolerance(cfg.tol)
        .init_method(KMeansInit::KMeansPlusPlus)
        .fit(&dataset)
        .map_err(|e| SpectralError::KMeans(e.to_string()))?;

    let mut labels = Array1::<usize>::zeros(points.nrows());
    model.predict_inplace(points, &mut labels);

    Ok(KMeansFit {
        labels: labels.to_vec(),
        centers: model.centroids().clone(),
        inertia: model.inertia(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn blobs() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [5.0, 5.0],
            [5.1, 5.0],
            [5.0, 5.1],
            [-5.0, 5.0],
            [-5.1, 5.0]
        ]
    }

    #[test]
    fn separates_obvious_blobs() {
        let fit = kmeans(&blobs(), 3, &SpectralConfig::default()).unwrap();
        let l = &fit.labels;
        assert_eq!(l[0], l[1]);
        assert_eq!(l[1], l[2]);
        assert_eq!(l[3], l[4]);
        assert_eq!(l[4], l[5]);
        assert_eq!(l[6], l[7]);
        assert_ne!(l[0], l[3]);
        assert_ne!(l[0], l[6]);
        assert_ne!(l[3], l[6]);
        assert!(fit.inertia < 0.1);
        assert_eq!(fit.centers.dim(), (3, 2));
    }

    #[test]
    fn same_seed_same_labels() {
        let cfg = SpectralConfig::default().with_seed(7);
        let a = kmeans(&blobs(), 3, &cfg).unwrap();
        let b = kmeans(&blobs(), 3, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn k_equal_n_gives_every_point_its_own_cluster() {
        let points = array![[0.0], [1.0], [2.0]];
        let fit = kmeans(&points, 3, &SpectralConfig::default()).unwrap();
        let mut labels = fit.labels.clone();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 3);
        assert!(fit.inertia < 1e-12);
    }

    #[test]
    fn labels_cover_every_point() {
        let fit = kmeans(&blobs(), 2, &SpectralConfig::default().with_n_init(1)).unwrap();
        assert_eq!(fit.labels.len(), 8);
        assert!(fit.labels.iter().all(|l| *l < 2));
    }
}
