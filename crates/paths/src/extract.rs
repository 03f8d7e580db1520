//! Structural path extraction.
//!
//! A structural path is the chain of namespace-stripped tag names from the
//! root to a node, joined with the configured separator. Paths are emitted in
//! document (pre-order) order and repeated paths are kept, so the output is a
//! multiset in walk order.

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PathConfig;
use crate::document::Element;
use crate::error::PathError;

/// Result of running the extractor over one document.
///
/// `failure` is set when the document could not be read or parsed; `paths`
/// is then empty and the document still takes part in the corpus as an
/// all-zero feature row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathExtraction {
    pub paths: Vec<String>,
    pub failure: Option<PathError>,
}

impl PathExtraction {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    fn failed(err: PathError) -> Self {
        Self {
            paths: Vec::new(),
            failure: Some(err),
        }
    }
}

/// Remove every `{...}` namespace qualifier from a tag.
///
/// An unterminated `{` is kept verbatim.
pub fn strip_namespace(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut rest = tag;
    while let Some(open) = rest.find('{') {
        match rest[open..].find('}') {
            // `{}` matches nothing in the qualifier grammar, keep it.
            Some(1) => {
                out.push_str(&rest[..open + 2]);
                rest = &rest[open + 2..];
            }
            Some(len) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + len + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Walk `root` in pre-order and emit one structural path per element.
///
/// Uses an explicit stack rather than recursion. The first path is always
/// the root's own clean tag.
pub fn extract_paths(root: &Element, cfg: &PathConfig) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(root.descendant_count() + 1);
    // (element, parent path index into `out`)
    let mut stack: Vec<(&Element, Option<usize>)> = vec![(root, None)];

    while let Some((el, parent)) = stack.pop() {
        let clean = strip_namespace(&el.tag);
        let path = match parent {
            Some(idx) => {
                let prefix = &out[idx];
                let mut p = String::with_capacity(prefix.len() + cfg.separator.len() + clean.len());
                p.push_str(prefix);
                p.push_str(&cfg.separator);
                p.push_str(&clean);
                p
            }
            None => clean,
        };
        let idx = out.len();
        out.push(path);
        // Reverse so the first child is popped first.
        for child in el.children.iter().rev() {
            stack.push((child, Some(idx)));
        }
    }
    out
}

/// Parse XML text and extract its paths.
///
/// Nesting deeper than [`PathConfig::max_depth`] is a
/// [`PathError::TooDeep`] failure.
pub fn extract_from_str(text: &str, cfg: &PathConfig) -> Result<Vec<String>, PathError> {
    let root = Element::from_xml_with_depth(text, cfg.max_depth)?;
    Ok(extract_paths(&root, cfg))
}

/// Read, parse and extract one document file.
///
/// Never fails past this boundary: read and parse problems are logged and
/// reported through [`PathExtraction::failure`].
pub fn extract_from_file(path: impl AsRef<Path>, cfg: &PathConfig) -> PathExtraction {
    let start = Instant::now();
    let path = path.as_ref();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            let err = PathError::Read(err.to_string());
            warn!(path = %path.display(), error = %err, "extract_failure");
            return PathExtraction::failed(err);
        }
    };

    match extract_from_str(&text, cfg) {
        Ok(paths) => {
            debug!(
                path = %path.display(),
                paths = paths.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "extract_success"
            );
            PathExtraction {
                paths,
                failure: None,
            }
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "extract_failure");
            PathExtraction::failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PathConfig {
        PathConfig::default()
    }

    #[test]
    fn strip_namespace_variants() {
        assert_eq!(strip_namespace("{urn:isbn:1-931666-22-9}ead"), "ead");
        assert_eq!(strip_namespace("archdesc"), "archdesc");
        assert_eq!(strip_namespace("{a}x{b}y"), "xy");
        assert_eq!(strip_namespace("{open"), "{open");
        assert_eq!(strip_namespace("{}odd"), "{}odd");
    }

    #[test]
    fn root_only_document_yields_single_path() {
        let paths = extract_paths(&Element::new("ead"), &cfg());
        assert_eq!(paths, vec!["ead"]);
    }

    #[test]
    fn preorder_with_repeated_paths() {
        let root = Element::new("ead")
            .with_child(Element::new("eadheader").with_child(Element::new("eadid")))
            .with_child(
                Element::new("archdesc")
                    .with_child(Element::new("did"))
                    .with_child(Element::new("did")),
            );
        let paths = extract_paths(&root, &cfg());
        assert_eq!(
            paths,
            vec![
                "ead",
                "ead/eadheader",
                "ead/eadheader/eadid",
                "ead/archdesc",
                "ead/archdesc/did",
                "ead/archdesc/did",
            ]
        );
    }

    #[test]
    fn path_count_is_one_plus_descendants() {
        let root = Element::new("a").with_children((0..5).map(|i| {
            Element::new(format!("c{i}")).with_children((0..i).map(|_| Element::new("leaf")))
        }));
        let paths = extract_paths(&root, &cfg());
        assert_eq!(paths.len(), 1 + root.descendant_count());
        assert_eq!(paths[0], "a");
        assert_eq!(paths.iter().filter(|p| p.as_str() == "a").count(), 1);
    }

    #[test]
    fn namespaces_stripped_along_the_path() {
        let paths = extract_from_str(
            r#"<ead xmlns="urn:isbn:1-931666-22-9"><archdesc><dsc/></archdesc></ead>"#,
            &cfg(),
        )
        .unwrap();
        assert_eq!(paths, vec!["ead", "ead/archdesc", "ead/archdesc/dsc"]);
    }

    #[test]
    fn custom_separator() {
        let root = Element::new("a").with_child(Element::new("b"));
        let paths = extract_paths(&root, &PathConfig::new().with_separator("."));
        assert_eq!(paths, vec!["a", "a.b"]);
    }

    #[test]
    fn deep_document_does_not_recurse() {
        let mut el = Element::new("n");
        for _ in 0..2_000 {
            el = Element::new("n").with_child(el);
        }
        let paths = extract_paths(&el, &cfg());
        assert_eq!(paths.len(), 2_001);
        assert_eq!(paths[1], "n/n");
    }

    #[test]
    fn deeply_nested_text_parses_without_overflow() {
        let depth = 5_000;
        let xml = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
        let paths = extract_from_str(&xml, &cfg()).unwrap();
        assert_eq!(paths.len(), depth);
        assert_eq!(paths[2], "n/n/n");
    }

    #[test]
    fn nesting_limit_fails_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deep.xml");
        fs::write(&file, "<a><b><c><d/></c></b></a>").unwrap();
        let out = extract_from_file(&file, &PathConfig::new().with_max_depth(3));
        assert!(out.paths.is_empty());
        assert_eq!(out.failure, Some(PathError::TooDeep { limit: 3 }));
    }

    #[test]
    fn file_extraction_success() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ok.xml");
        fs::write(&file, "<ead><archdesc/></ead>").unwrap();
        let out = extract_from_file(&file, &cfg());
        assert!(!out.is_failed());
        assert_eq!(out.paths, vec!["ead", "ead/archdesc"]);
    }

    #[test]
    fn malformed_file_yields_empty_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.xml");
        fs::write(&file, "<ead><archdesc></ead>").unwrap();
        let out = extract_from_file(&file, &cfg());
        assert!(out.paths.is_empty());
        assert!(matches!(out.failure, Some(PathError::Parse(_))));
    }

    #[test]
    fn unreadable_file_yields_empty_paths() {
        let dir = tempfile::tempdir().unwrap();
        let out = extract_from_file(dir.path().join("missing.xml"), &cfg());
        assert!(out.paths.is_empty());
        assert!(matches!(out.failure, Some(PathError::Read(_))));
    }

    #[test]
    fn failed_extraction_serializes_with_its_error() {
        let out = extract_from_file(std::path::Path::new("/nonexistent/a.xml"), &cfg());
        let json = serde_json::to_string(&out).unwrap();
        let back: PathExtraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
        assert!(json.contains("Read"));
    }
}
