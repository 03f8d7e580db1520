use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while enumerating a corpus.
///
/// All of these are corpus-level failures: an individual unreadable file is
/// not a discovery error, it surfaces later as an empty extraction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorpusError {
    #[error("invalid corpus configuration: {0}")]
    InvalidConfig(String),
    #[error("corpus root {} does not exist", .0.display())]
    RootNotFound(PathBuf),
    #[error("corpus root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to walk corpus: {0}")]
    Walk(String),
    #[error("no documents found under {} (extensions: {extensions})", .root.display())]
    NoDocuments { root: PathBuf, extensions: String },
}
