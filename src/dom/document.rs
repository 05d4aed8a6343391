//! The live document: a style area (head) and an element tree (body).
//!
//! Style blocks are append-only. Only the style registry adds to the head and
//! nothing ever removes or replaces a block, so remounting a component never
//! disturbs previously injected rules.

use super::tree::Dom;

/// One `<style>` element in the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBlock {
    /// Identifier the block was injected for.
    pub identifier: String,
    /// Raw CSS rule text, in injection order.
    pub rules: Vec<String>,
}

impl StyleBlock {
    /// The style element's text content: rules concatenated in order.
    pub fn css_text(&self) -> String {
        self.rules.concat()
    }

    /// Serialized `<style>` markup.
    pub fn to_html(&self) -> String {
        format!("<style>{}</style>", self.css_text())
    }
}

/// A live document.
#[derive(Debug, Default)]
pub struct Document {
    head: Vec<StyleBlock>,
    /// Elements rendered into the page.
    pub body: Dom,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a style block to the head.
    pub(crate) fn append_style(&mut self, block: StyleBlock) {
        self.head.push(block);
    }

    /// Style blocks in injection order.
    pub fn style_blocks(&self) -> &[StyleBlock] {
        &self.head
    }

    /// Style blocks injected for `identifier`.
    pub fn blocks_for<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = &'a StyleBlock> + 'a {
        self.head.iter().filter(move |b| b.identifier == identifier)
    }

    /// Serialized head contents.
    pub fn head_html(&self) -> String {
        self.head.iter().map(StyleBlock::to_html).collect()
    }
}
