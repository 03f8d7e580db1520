//! EADScope structural path layer.
//!
//! Turns one XML document into the ordered multiset of its structural paths:
//! namespace-stripped tag lineages from the root down to every element.
//!
//! ## What we do
//!
//! - Parse XML into an owned [`Element`] tree that keeps tags and child order
//! - Strip `{uri}` namespace qualifiers from every tag
//! - Walk the tree in pre-order and join tag lineages with a separator
//!
//! ## What we don't do
//!
//! Attribute values, text nodes, comments and processing instructions are
//! ignored. Two documents with identical nesting but different content have
//! identical path sequences.
//!
//! ## Failure model
//!
//! [`extract_from_file`] never returns an error. Unreadable or malformed
//! files are logged and come back as an empty [`PathExtraction`] carrying the
//! failure, so the corpus run can continue.
//!
//! ```
//! use paths::{extract_from_str, PathConfig};
//!
//! let paths = extract_from_str("<ead><archdesc><did/></archdesc></ead>", &PathConfig::default()).unwrap();
//! assert_eq!(paths, vec!["ead", "ead/archdesc", "ead/archdesc/did"]);
//! ```

mod config;
mod document;
mod error;
mod extract;

pub use crate::config::{PathConfig, DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};
pub use crate::document::Element;
pub use crate::error::PathError;
pub use crate::extract::{
    extract_from_file, extract_from_str, extract_paths, strip_namespace, PathExtraction,
};
