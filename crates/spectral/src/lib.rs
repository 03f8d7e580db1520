//! # EADScope Spectral
//!
//! Graph-spectral clustering of documents over a precomputed affinity
//! matrix, plus the scoring used to pick a cluster count.
//!
//! ## Core Pipeline
//!
//! 1.  **Laplacian**: symmetric normalised Laplacian of the affinity graph,
//!     self-loops ignored, isolated documents kept with a zero row.
//!
//! 2.  **Embedding**: symmetric eigen-decomposition (`linfa-linalg`), done
//!     once per affinity matrix. The `k` smallest eigenvectors
//!     (degree-scaled and sign-normalised) embed each document as a point
//!     in `R^k`.
//!
//! 3.  **Partition**: `linfa-clustering` k-means++ with several restarts
//!     over the embedded points. The RNG is a `ChaCha8Rng` seeded from
//!     [`SpectralConfig::seed`] on every call, so equal input gives equal
//!     labels. Labels are numbered by first appearance.
//!
//! 4.  **Selection**: each candidate `k` is scored by mean silhouette width
//!     over the distance matrix; degenerate or failed candidates get
//!     [`SENTINEL_SCORE`]. An eigengap report rides along as a second
//!     opinion.
//!
//! ## Example Usage
//!
//! ```
//! use ndarray::array;
//! use spectral::{select_k, SelectorConfig, SpectralConfig, SpectralPartitioner};
//!
//! let affinity = array![
//!     [1.0, 0.9, 0.0, 0.0],
//!     [0.9, 1.0, 0.0, 0.0],
//!     [0.0, 0.0, 1.0, 0.9],
//!     [0.0, 0.0, 0.9, 1.0],
//! ];
//! let distance = affinity.mapv(|v| 1.0 - v);
//!
//! let labels = SpectralPartitioner::default().partition(&affinity, 2).unwrap();
//! assert_eq!(labels.labels(), &[0, 0, 1, 1]);
//!
//! let choice = select_k(
//!     &affinity,
//!     &distance,
//!     &SelectorConfig::default(),
//!     &SpectralConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(choice.recommended_k, 2);
//! ```

mod config;
mod eigen;
mod embedding;
mod error;
mod kmeans;
mod laplacian;
mod partition;
mod selector;
mod silhouette;

pub use crate::config::{
    SelectorConfig, SpectralConfig, DEFAULT_K_MAX, DEFAULT_K_MIN, DEFAULT_MAX_ITER,
    DEFAULT_N_INIT, DEFAULT_SEED, DEFAULT_TOL,
};
pub use crate::eigen::{symmetric_eigen, SymmetricEigen};
pub use crate::embedding::SpectralEmbedding;
pub use crate::error::SpectralError;
pub use crate::kmeans::{kmeans, KMeansFit};
pub use crate::laplacian::{normalized_laplacian, NormalizedLaplacian};
pub use crate::partition::{validate_k, ClusterAssignment, SpectralPartitioner};
pub use crate::selector::{
    candidate_range, eigengap, select_k, CandidateOutcome, CandidateScore, EigenGap,
    EigengapReport, KSelection, SENTINEL_SCORE,
};
pub use crate::silhouette::{silhouette_score, silhouette_samples};
