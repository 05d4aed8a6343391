//! Node types: NodeId, Element.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for an element. Copy, lightweight (u64).
    pub struct NodeId;
}

/// A single element in the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, e.g. `div`.
    pub tag: String,
    /// Class names in assignment order, without duplicates.
    pub classes: Vec<String>,
    /// Text content, if any.
    pub text: Option<String>,
}

impl Element {
    /// Create an element with the given tag and no classes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            text: None,
        }
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl AsRef<str>) -> Self {
        self.add_class(class.as_ref());
        self
    }

    /// Add multiple classes (builder).
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        for class in classes {
            self.add_class(class.as_ref());
        }
        self
    }

    /// Check whether this element has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// The `class` attribute value: classes joined by spaces.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}
