//! EADScope corpus layer.
//!
//! This is where documents enter the pipeline. We take a directory, walk it,
//! keep the files that look like finding aids and hand back an ordered list
//! of [`SourceDocument`] handles.
//!
//! ## What we guarantee
//!
//! - **Deterministic order** - documents are sorted by path, so the
//!   vocabulary built downstream gets the same indices on every run over an
//!   unchanged directory.
//! - **Dense indices** - `SourceDocument::index` runs `0..n` in that order and
//!   is the row index used by every matrix later on.
//! - **No content access** - discovery never opens a file. An unreadable
//!   document is the extractor's problem, not ours.
//! - **Loud emptiness** - a corpus with zero matching files is an error
//!   ([`CorpusError::NoDocuments`]), never an empty success.
//!
//! ## Example
//!
//! ```no_run
//! use corpus::{discover_documents, CorpusConfig};
//!
//! let docs = discover_documents("finding-aids/", &CorpusConfig::default()).unwrap();
//! for doc in &docs {
//!     println!("{} -> {}", doc.index, doc.id);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

mod config;
mod error;

pub use crate::config::{CorpusConfig, DEFAULT_EXTENSION};
pub use crate::error::CorpusError;

/// Opaque handle on one document of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Row index of this document in every downstream matrix.
    pub index: usize,
    /// Stable identifier; the path rendered as a string.
    pub id: String,
    pub path: PathBuf,
}

impl SourceDocument {
    /// File name component, falling back to the full id.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.id)
    }
}

/// Enumerate every matching document below `root`, sorted by path.
pub fn discover_documents(
    root: impl AsRef<Path>,
    cfg: &CorpusConfig,
) -> Result<Vec<SourceDocument>, CorpusError> {
    let start = Instant::now();
    let root = root.as_ref();
    cfg.validate()?;

    if !root.exists() {
        return Err(CorpusError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(cfg.follow_links);
    if !cfg.recursive {
        walker = walker.max_depth(1);
    }

    let mut paths = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // The root itself failing is fatal; a single unreadable
                // sub-directory is not.
                if err.depth() == 0 {
                    return Err(CorpusError::Walk(err.to_string()));
                }
                warn!(error = %err, "corpus_walk_skip");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| cfg.accepts_extension(ext));
        if matches {
            debug!(path = %entry.path().display(), "corpus_document");
            paths.push(entry.into_path());
        }
    }

    if paths.is_empty() {
        warn!(root = %root.display(), "corpus_empty");
        return Err(CorpusError::NoDocuments {
            root: root.to_path_buf(),
            extensions: cfg.extensions.join(","),
        });
    }

    paths.sort();
    let documents: Vec<SourceDocument> = paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| SourceDocument {
            index,
            id: path.display().to_string(),
            path,
        })
        .collect();

    info!(
        root = %root.display(),
        documents = documents.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "corpus_discovered"
    );
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "<ead/>").unwrap();
    }

    #[test]
    fn discovers_recursively_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.xml");
        touch(dir.path(), "a.xml");
        touch(dir.path(), "nested/c.XML");
        touch(dir.path(), "notes.txt");

        let docs = discover_documents(dir.path(), &CorpusConfig::default()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.file_name()).collect();
        assert_eq!(names, vec!["a.xml", "b.xml", "c.XML"]);
        let indices: Vec<usize> = docs.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(docs[0].id, docs[0].path.display().to_string());
    }

    #[test]
    fn non_recursive_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.xml");
        touch(dir.path(), "deep/inner.xml");

        let cfg = CorpusConfig::new().with_recursive(false);
        let docs = discover_documents(dir.path(), &cfg).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_name(), "top.xml");
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");
        let res = discover_documents(dir.path(), &CorpusConfig::default());
        assert!(matches!(res, Err(CorpusError::NoDocuments { .. })));
        let msg = res.unwrap_err().to_string();
        assert!(msg.contains("no documents found"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover_documents(&missing, &CorpusConfig::default()),
            Err(CorpusError::RootNotFound(_))
        ));
    }

    #[test]
    fn file_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "single.xml");
        let res = discover_documents(dir.path().join("single.xml"), &CorpusConfig::default());
        assert!(matches!(res, Err(CorpusError::NotADirectory(_))));
    }

    #[test]
    fn custom_extensions_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "one.ead");
        touch(dir.path(), "two.xml");
        let cfg = CorpusConfig::new().with_extensions(["ead"]);
        let docs = discover_documents(dir.path(), &cfg).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_name(), "one.ead");
    }
}
