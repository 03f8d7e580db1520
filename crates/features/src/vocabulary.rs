//! Structural path vocabulary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from structural path to column index.
///
/// Indices are handed out in first-seen order, are dense from 0 and never
/// change once assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    paths: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `path`, assigning the next free index on first sight.
    pub fn intern(&mut self, path: &str) -> usize {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.paths.len();
        self.paths.push(path.to_owned());
        self.index.insert(path.to_owned(), idx);
        idx
    }

    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn path(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `(index, path)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.paths.iter().enumerate().map(|(i, p)| (i, p.as_str()))
    }
}
