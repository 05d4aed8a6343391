//! Typed rule tree: StyleSheet, Rule, StyleRule, MediaRule, AtRule, Declaration.

use crate::css::normalize;

/// A single property declaration, e.g. `color: red` or `color: red !important`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name. Lowercased unless it is a custom property (`--x`).
    pub property: String,
    /// Normalized value text, without `!important`.
    pub value: String,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    /// Create a declaration, normalizing the property name and value.
    pub fn new(property: &str, value: &str, important: bool) -> Self {
        let property = property.trim();
        let property = if property.starts_with("--") {
            property.to_owned()
        } else {
            property.to_ascii_lowercase()
        };
        Self {
            property,
            value: normalize::value(value),
            important,
        }
    }
}

/// A style rule: a selector list with declarations and nested rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Normalized selectors, one per comma-separated entry.
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
    /// Nested style and at-rules (CSS nesting).
    pub rules: Vec<Rule>,
}

/// An `@media` block.
///
/// Declarations placed directly inside apply to the enclosing style rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRule {
    /// Normalized condition text, e.g. `screen` or `(min-width: 2px)`.
    pub condition: String,
    pub declarations: Vec<Declaration>,
    pub rules: Vec<Rule>,
}

/// Any other at-rule (`@supports`, `@font-face`, `@keyframes`, `@import`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Lowercased name without the `@`.
    pub name: String,
    /// Raw prelude text after the name.
    pub prelude: String,
    pub declarations: Vec<Declaration>,
    pub rules: Vec<Rule>,
}

/// One node in the rule tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Style(StyleRule),
    Media(MediaRule),
    At(AtRule),
}

/// A parsed stylesheet: top-level rules in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub rules: Vec<Rule>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }
}

/// Resolve nested selectors against their parent selector list.
///
/// `&` is replaced by each parent selector. A selector without `&` is a
/// descendant of the parent. With no parents the selectors are returned as is.
pub fn resolve_nested(parents: &[String], selectors: &[String]) -> Vec<String> {
    if parents.is_empty() {
        return selectors.to_vec();
    }

    let mut resolved = Vec::with_capacity(parents.len() * selectors.len());
    for parent in parents {
        for selector in selectors {
            let full = if selector.contains('&') {
                selector.replace('&', parent)
            } else {
                format!("{parent} {selector}")
            };
            resolved.push(normalize::selector(&full));
        }
    }
    resolved
}
