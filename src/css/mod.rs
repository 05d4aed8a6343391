//! CSS engine: tokenizer, parser, typed rule tree, normalization.

pub mod tokenizer;
pub mod model;
pub mod normalize;
pub mod parser;

pub use model::{AtRule, Declaration, MediaRule, Rule, StyleRule, StyleSheet};
pub use parser::{parse_stylesheet, ParseError};
