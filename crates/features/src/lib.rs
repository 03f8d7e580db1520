//! # EADScope Features
//!
//! Turns per-document structural path sequences into numbers the clustering
//! stage can work with.
//!
//! ## Core Pipeline
//!
//! 1.  **Vocabulary**: every distinct structural path gets a column index in
//!     first-seen order across the corpus scan. Indices are dense and never
//!     renumbered, so a fixed document order gives a fixed vocabulary.
//!
//! 2.  **Feature matrix**: a sparse document-by-path count matrix. Row `d`
//!     is the multiset count vector of document `d`. Documents that yielded
//!     no paths (for instance because they failed to parse) keep an all-zero
//!     row instead of being dropped.
//!
//! 3.  **Similarity**: dense pairwise cosine affinity and `1 - affinity`
//!     distance. Zero-norm rows get affinity `0` against everything,
//!     themselves included, rather than `NaN`.
//!
//! ## Example Usage
//!
//! ```
//! use features::{build_feature_matrix, compute_similarity, SimilarityConfig};
//!
//! let docs = vec![
//!     vec!["ead", "ead/archdesc"],
//!     vec!["ead", "ead/archdesc"],
//! ];
//! let set = build_feature_matrix(&docs).unwrap();
//! let sims = compute_similarity(&set.matrix, &SimilarityConfig::default());
//!
//! assert_eq!(set.vocabulary.len(), 2);
//! assert!((sims.affinity[[0, 1]] - 1.0).abs() < 1e-12);
//! ```

mod config;
mod matrix;
mod similarity;
mod vocabulary;

pub use crate::config::{FeatureError, SimilarityConfig};
pub use crate::matrix::{build_feature_matrix, FeatureMatrix, FeatureSet};
pub use crate::similarity::{compute_similarity, SimilarityMatrices};
pub use crate::vocabulary::Vocabulary;
