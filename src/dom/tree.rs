//! Element tree: insert, remove, walk.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Element, NodeId};

const EMPTY_CHILDREN: &[NodeId] = &[];

/// The document body, backed by a slotmap arena.
///
/// Parent/child relationships live in secondary maps so that removal is
/// O(subtree size) and lookup is O(1). Top-level elements are kept in
/// insertion order.
#[derive(Debug, Default)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, Element>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    roots: Vec<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a top-level element.
    pub fn insert(&mut self, element: Element) -> NodeId {
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        self.roots.push(id);
        id
    }

    /// Insert an element as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn insert_child(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        Some(id)
    }

    /// Remove an element and all its descendants.
    ///
    /// Returns the removed element, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<Element> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        match self.parent.remove(id) {
            Some(parent_id) => {
                if let Some(siblings) = self.children.get_mut(parent_id) {
                    siblings.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }

        let mut to_remove = vec![id];
        let mut removed = None;
        while let Some(current) = to_remove.pop() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let element = self.nodes.remove(current);
            if current == id {
                removed = element;
            }
        }

        removed
    }

    /// The parent of an element, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// The children of an element. Empty if it has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors from the immediate parent up to the top-level element.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    /// Top-level elements in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Every element in document order (pre-order, depth-first, top-level
    /// elements in insertion order).
    pub fn walk(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            // Reverse so the first child is visited first.
            stack.extend(self.children(current).iter().rev());
        }
        result
    }
}
