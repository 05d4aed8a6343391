//! Host document model: slotmap-backed element tree and the style area.

pub mod node;
pub mod tree;
pub mod query;
pub mod document;

pub use document::{Document, StyleBlock};
pub use node::{Element, NodeId};
pub use tree::Dom;
