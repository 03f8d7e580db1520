use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while turning a document into structural paths.
///
/// `Read` and `Parse` are per-document failures. The file-level entry point
/// [`extract_from_file`](crate::extract_from_file) never returns them as
/// `Err`; it records them on the [`PathExtraction`](crate::PathExtraction)
/// instead so one bad document cannot stop the corpus.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read document: {0}")]
    Read(String),
    #[error("malformed document: {0}")]
    Parse(String),
    #[error("document nests deeper than {limit} elements")]
    TooDeep { limit: usize },
}
