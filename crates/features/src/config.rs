//! Configuration and error types for the feature layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables for the similarity/distance engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SimilarityConfig {
    /// Compute matrix rows on the rayon pool.
    ///
    /// Every cell is computed by the same arithmetic either way, so the
    /// parallel and sequential outputs are bit-identical.
    pub use_parallel: bool,
}

impl SimilarityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }
}

/// Errors returned by the feature layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("cannot build a feature matrix from an empty document collection")]
    EmptyCorpus,

    #[error("row {row} out of range for a matrix with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
}
