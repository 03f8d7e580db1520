//! Configuration for structural path extraction.

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Separator placed between tag names of a structural path.
pub const DEFAULT_SEPARATOR: &str = "/";
/// Deepest element nesting accepted from a parsed document.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Controls how structural paths are rendered.
///
/// The separator is part of a path's identity: two runs with different
/// separators produce different vocabularies and cannot be compared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathConfig {
    /// String joining consecutive tag names. The root path carries no prefix.
    pub separator: String,
    /// Documents nested deeper than this many elements fail to parse.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl PathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<(), PathError> {
        if self.max_depth == 0 {
            return Err(PathError::InvalidConfig("max_depth must be >= 1".into()));
        }
        if self.separator.is_empty() {
            return Err(PathError::InvalidConfig(
                "path separator must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_separator_is_slash() {
        assert_eq!(PathConfig::default().separator, "/");
        assert!(PathConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_separator_rejected() {
        let cfg = PathConfig::new().with_separator("");
        assert!(matches!(cfg.validate(), Err(PathError::InvalidConfig(_))));
        let cfg = PathConfig::new().with_max_depth(0);
        assert!(matches!(cfg.validate(), Err(PathError::InvalidConfig(_))));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = PathConfig::new().with_separator(".");
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PathConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
