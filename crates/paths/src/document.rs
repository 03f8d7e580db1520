//! Owned element tree used as the document model.
//!
//! Only tag names and child order survive conversion. Attributes, text and
//! comments are dropped on purpose: the analysis looks at nesting shape only.

use roxmltree::{Node, ParsingOptions};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::PathError;

fn clark_name(node: Node<'_, '_>) -> String {
    let name = node.tag_name();
    match name.namespace() {
        Some(ns) => format!("{{{ns}}}{}", name.name()),
        None => name.name().to_string(),
    }
}

/// One element of a document: a (possibly namespace-qualified) tag and its
/// ordered element children.
///
/// Namespaced tags are stored in Clark notation, `{uri}local`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Leaf element with no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style child append, handy for constructing trees in tests.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    /// Parse XML text and return its root element, nesting capped at
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn from_xml(text: &str) -> Result<Self, PathError> {
        Self::from_xml_with_depth(text, DEFAULT_MAX_DEPTH)
    }

    /// Parse XML text, rejecting documents nested deeper than `max_depth`
    /// elements (the root is depth 1).
    ///
    /// DTDs are accepted since finding aids routinely carry a DOCTYPE.
    pub fn from_xml_with_depth(text: &str, max_depth: usize) -> Result<Self, PathError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)
            .map_err(|err| PathError::Parse(err.to_string()))?;
        Self::from_root(doc.root_element(), max_depth)
    }

    /// Copy the element skeleton below `root` without recursing.
    fn from_root(root: Node<'_, '_>, max_depth: usize) -> Result<Self, PathError> {
        // Pre-order: every parent index is smaller than its children's.
        let mut flat: Vec<(Option<Element>, Option<usize>)> = Vec::new();
        let mut stack = vec![(root, None, 1usize)];
        while let Some((node, parent, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(PathError::TooDeep { limit: max_depth });
            }
            let idx = flat.len();
            flat.push((Some(Self::new(clark_name(node))), parent));
            let children: Vec<Node<'_, '_>> =
                node.children().filter(|child| child.is_element()).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(idx), depth + 1));
            }
        }

        // Attach bottom-up. Children arrive last-first, so flip each list
        // once all of an element's children are in.
        for idx in (1..flat.len()).rev() {
            let (slot, parent) = &mut flat[idx];
            let (Some(mut el), Some(parent)) = (slot.take(), *parent) else {
                continue;
            };
            el.children.reverse();
            if let Some(parent_el) = flat[parent].0.as_mut() {
                parent_el.children.push(el);
            }
        }
        let mut root = flat
            .first_mut()
            .and_then(|(slot, _)| slot.take())
            .ok_or_else(|| PathError::Parse("document has no root element".into()))?;
        root.children.reverse();
        Ok(root)
    }

    /// Number of elements below this one (excluding itself).
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Element> = self.children.iter().collect();
        while let Some(el) = stack.pop() {
            count += 1;
            stack.extend(el.children.iter());
        }
        count
    }
}

// Tear down children from a flat list so deep trees do not drop recursively.
impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut el) = pending.pop() {
            pending.append(&mut el.children);
        }
    }
}
