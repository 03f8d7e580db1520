//! Configuration for corpus discovery.
//!
//! [`CorpusConfig`] decides which files under the corpus root count as
//! documents. Discovery itself never opens the files; reading and parsing
//! belong to the path extraction stage.

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// Extension matched when no explicit filter is configured.
pub const DEFAULT_EXTENSION: &str = "xml";

/// Controls how a corpus directory is enumerated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusConfig {
    /// File extensions (without the leading dot) that identify documents.
    ///
    /// Matching is ASCII case-insensitive, so `xml` also accepts `.XML`.
    pub extensions: Vec<String>,
    /// Descend into sub-directories.
    pub recursive: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl CorpusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extension filter.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Validate the extension filter.
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.extensions.is_empty() {
            return Err(CorpusError::InvalidConfig(
                "at least one document extension is required".into(),
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.trim().is_empty() || ext.contains(['/', '\\']))
        {
            return Err(CorpusError::InvalidConfig(format!(
                "invalid document extension {bad:?}"
            )));
        }
        Ok(())
    }

    /// Whether `ext` (as reported by the file system, no leading dot) is accepted.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .map(|allowed| allowed.trim_start_matches('.'))
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            recursive: true,
            follow_links: false,
        }
    }
}
