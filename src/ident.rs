//! Content-derived identifiers and property-name case conversion.
//!
//! Identifiers hash the literal text they are given. Two style blocks that
//! differ only in whitespace get different identifiers; cached injection
//! relies on this.

use std::fmt;

use crate::hash::{hash, ContentHash};

/// Prefix for generated class names.
pub const CLASS_PREFIX: &str = "cc";

/// Prefix for generated custom property names (after the leading `--`).
pub const VARIABLE_PREFIX: &str = "var";

/// What an [`Identifier`] names in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// A class name, e.g. `cc-1rr6d23`.
    Class,
    /// A custom property name, e.g. `--var-kmurgp`.
    Variable,
}

/// A stable, content-derived class or custom property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    kind: IdentifierKind,
    hash: ContentHash,
    name: String,
}

impl Identifier {
    fn new(kind: IdentifierKind, hash: ContentHash) -> Self {
        let name = match kind {
            IdentifierKind::Class => format!("{CLASS_PREFIX}-{hash}"),
            IdentifierKind::Variable => format!("--{VARIABLE_PREFIX}-{hash}"),
        };
        Self { kind, hash, name }
    }

    /// The rendered name.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// The hash the name was built from.
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Selector text for a class identifier (`.cc-…`). Variables have none.
    pub fn class_selector(&self) -> Option<String> {
        match self.kind {
            IdentifierKind::Class => Some(format!(".{}", self.name)),
            IdentifierKind::Variable => None,
        }
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Class identifier for a block of resolved CSS text: `cc-<hash>`.
pub fn class_identifier(css: &str) -> Identifier {
    Identifier::new(IdentifierKind::Class, hash(css))
}

/// Custom property identifier for an expression's source text: `--var-<hash>`.
pub fn variable_identifier(expression: &str) -> Identifier {
    Identifier::new(IdentifierKind::Variable, hash(expression))
}

/// Convert a camelCase property name to kebab-case.
///
/// Uppercase ASCII and Latin-1 uppercase letters become `-` plus their
/// lowercase form. `ms` is the one vendor prefix written lowercase in
/// camelCase, so `msTransform` becomes `-ms-transform`. Custom properties
/// and names that are already kebab-case pass through unchanged.
pub fn kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_owned();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if is_upper(c) {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

/// Convert a kebab-case property name to camelCase.
///
/// The inverse of [`kebab_case`]: `-webkit-transform` becomes
/// `WebkitTransform` and `-ms-transform` becomes `msTransform`.
pub fn camel_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_owned();
    }

    let (mut out, rest) = match name.strip_prefix("-ms-") {
        Some(rest) => (String::from("ms-"), rest),
        None => (String::new(), name),
    };
    out.push_str(rest);

    let mut result = String::with_capacity(out.len());
    let mut upper_next = false;
    for c in out.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn is_upper(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{DE}')
}
