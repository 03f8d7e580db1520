//! Spectral partitioner: affinity graph in, hard cluster labels out.

use std::collections::HashMap;
use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SpectralConfig;
use crate::embedding::SpectralEmbedding;
use crate::error::SpectralError;
use crate::kmeans::kmeans;
use crate::laplacian::check_square;

/// Hard assignment of documents to clusters `0..k`.
///
/// Cluster ids carry no meaning beyond first appearance in document order:
/// the first document is always in cluster 0, the first document not in
/// cluster 0 is in cluster 1, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    k: usize,
}

impl ClusterAssignment {
    /// Wrap caller-supplied labels, checking they fall in `0..k`.
    pub fn from_labels(labels: Vec<usize>, k: usize) -> Result<Self, SpectralError> {
        if let Some(&label) = labels.iter().find(|l| **l >= k) {
            return Err(SpectralError::LabelOutOfRange { label, k });
        }
        Ok(Self { labels, k })
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn label(&self, doc: usize) -> Option<usize> {
        self.labels.get(doc).copied()
    }

    /// Requested cluster count.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of cluster ids that actually have members.
    pub fn distinct_clusters(&self) -> usize {
        let mut seen = vec![false; self.k];
        for &l in &self.labels {
            seen[l] = true;
        }
        seen.into_iter().filter(|s| *s).count()
    }

    /// Documents assigned to `cluster`, in document order.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Member count per cluster id.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }
}

/// Renumber labels by order of first appearance.
fn relabel_by_first_appearance(labels: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|l| {
            let next = mapping.len();
            *mapping.entry(*l).or_insert(next)
        })
        .collect()
}

/// Graph-spectral clustering over a precomputed affinity matrix.
#[derive(Debug, Clone, Default)]
pub struct SpectralPartitioner {
    config: SpectralConfig,
}

impl SpectralPartitioner {
    pub fn new(config: SpectralConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpectralConfig {
        &self.config
    }

    /// Partition the documents of `affinity` into `k` clusters.
    pub fn partition(
        &self,
        affinity: &Array2<f64>,
        k: usize,
    ) -> Result<ClusterAssignment, SpectralError> {
        self.config.validate()?;
        let n = check_square(affinity)?;
        validate_k(k, n)?;
        let embedding = SpectralEmbedding::compute(affinity)?;
        self.partition_embedding(&embedding, k)
    }

    /// Partition using a precomputed embedding.
    ///
    /// k-means is seeded fresh from the config on every call, so the labels
    /// for a given `k` do not depend on which other `k` were tried first.
    pub fn partition_embedding(
        &self,
        embedding: &SpectralEmbedding,
        k: usize,
    ) -> Result<ClusterAssignment, SpectralError> {
        let start = Instant::now();
        validate_k(k, embedding.len())?;

        let points = embedding.rows(k);
        let fit = kmeans(&points, k, &self.config)?;
        let assignment = ClusterAssignment::from_labels(relabel_by_first_appearance(&fit.labels), k)?;

        info!(
            k,
            documents = assignment.len(),
            distinct = assignment.distinct_clusters(),
            inertia = fit.inertia,
            elapsed_micros = start.elapsed().as_micros(),
            "spectral_partition"
        );
        Ok(assignment)
    }
}

/// `2 <= k < n`.
pub fn validate_k(k: usize, n: usize) -> Result<(), SpectralError> {
    if k < 2 || k >= n {
        return Err(SpectralError::InvalidK { k, n });
    }
    Ok(())
}
