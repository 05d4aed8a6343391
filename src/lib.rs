//! # stylehash
//!
//! Runtime for compile-time extracted, content-addressed CSS.
//!
//! A build step turns style declarations into CSS rule text and names each
//! block by the hash of its content. At runtime this crate injects those
//! blocks into a document at most once per identifier, warns about selectors
//! that break under shared classes, and lets tests assert which styles apply
//! to an element.
//!
//! ## Core Systems
//!
//! - **[`hash`]**: MurmurHash2 content hash rendered in base 36
//! - **[`ident`]**: `cc-` class and `--var-` custom property identifiers
//! - **[`css`]**: tokenizer, parser and normalizer for generated CSS text
//! - **[`dom`]**: slotmap-backed host document with a `<head>` of style blocks
//! - **[`registry`]**: once-per-identifier injection state
//! - **[`risk`]**: positional pseudo-class detector
//! - **[`matcher`]**: style assertions against an element's declared rules
//! - **[`context`]**: `StyleContext`, the per-document owner of all of the above
//! - **[`config`]**: development/production mode

pub mod config;
pub mod hash;
pub mod ident;

pub mod css;
pub mod dom;

pub mod registry;
pub mod risk;

pub mod matcher;

pub mod context;

pub use config::{Mode, StyleConfig};
pub use context::{StyleContext, StyledElement};
pub use hash::{hash, ContentHash};
pub use ident::{class_identifier, variable_identifier, Identifier};
pub use matcher::{Expected, Filter, MatchResult, QueryError};
pub use registry::Injection;
