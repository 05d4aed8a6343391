//! Element queries: by class, tag, text; generic predicate matching.
//!
//! All queries return elements in document order.

use super::node::{Element, NodeId};
use super::tree::Dom;

impl Dom {
    /// All elements that have the given class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|el| el.has_class(class))
    }

    /// All elements with the given tag name.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|el| el.tag == tag)
    }

    /// The first element whose text content is exactly `text`.
    pub fn query_by_text(&self, text: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|&id| self.get(id).and_then(|el| el.text.as_deref()) == Some(text))
    }

    /// All elements matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}
