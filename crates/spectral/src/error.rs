use thiserror::Error;

/// Errors returned by the spectral layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpectralError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix shape {rows}x{cols} does not match {expected} documents")]
    Misaligned {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("matrix contains non-finite values")]
    NonFinite,

    #[error("cluster count k={k} out of range: need 2 <= k < {n} documents")]
    InvalidK { k: usize, n: usize },

    #[error("empty cluster-count search range: k_min={k_min}, k_max={k_max}, documents={n}")]
    EmptySearchRange { k_min: usize, k_max: usize, n: usize },

    #[error("eigen-decomposition failed: {0}")]
    Eigen(String),

    #[error("k-means failed: {0}")]
    KMeans(String),

    #[error("silhouette needs at least 2 clusters, found {found}")]
    TooFewClusters { found: usize },

    #[error("label {label} out of range for k={k}")]
    LabelOutOfRange { label: usize, k: usize },
}
