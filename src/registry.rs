//! Style registry: at-most-once injection of style blocks per identifier.
//!
//! [`RegistryState`] is append-only while one document stays attached.
//! Marking is a single test-and-set on one thread, so repeated calls within a
//! render pass can never inject the same identifier twice.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::dom::{Document, StyleBlock};

/// Which identifiers have been injected and which have been warned about.
#[derive(Debug, Default, Clone)]
pub struct RegistryState {
    injected: HashSet<String>,
    warned: HashSet<String>,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `identifier` injected. Returns `true` if it was not marked before.
    pub fn mark_injected(&mut self, identifier: &str) -> bool {
        self.injected.insert(identifier.to_owned())
    }

    pub fn is_injected(&self, identifier: &str) -> bool {
        self.injected.contains(identifier)
    }

    /// Mark `identifier` warned. Returns `true` if it was not marked before.
    pub fn mark_warned(&mut self, identifier: &str) -> bool {
        self.warned.insert(identifier.to_owned())
    }

    pub fn is_warned(&self, identifier: &str) -> bool {
        self.warned.contains(identifier)
    }

    /// Number of injected identifiers.
    pub fn injected_count(&self) -> usize {
        self.injected.len()
    }

    /// Replace the injected set with the identifiers a newly attached
    /// document already holds. Warned identifiers are kept.
    pub fn sync_injected<'a>(&mut self, identifiers: impl IntoIterator<Item = &'a str>) {
        self.injected = identifiers.into_iter().map(str::to_owned).collect();
    }

    /// Forget everything. Only for external teardown between sessions.
    pub fn clear(&mut self) {
        self.injected.clear();
        self.warned.clear();
    }
}

/// Outcome of [`StyleRegistry::ensure_injected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// A new style block was appended to the document.
    Inserted,
    /// The identifier was already injected; nothing changed.
    AlreadyInjected,
    /// No document is available; nothing changed and nothing was marked.
    Deferred,
}

/// Owns the registry state and performs injection.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    state: RegistryState,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one style block holding `rules` unless `identifier` is already
    /// injected.
    ///
    /// Without a document this is a no-op and the identifier stays unmarked,
    /// so the first call after a document is attached still injects.
    pub fn ensure_injected<S: AsRef<str>>(
        &mut self,
        document: Option<&mut Document>,
        identifier: &str,
        rules: &[S],
    ) -> Injection {
        let Some(document) = document else {
            debug!(identifier, "no document, deferring style injection");
            return Injection::Deferred;
        };

        if !self.state.mark_injected(identifier) {
            trace!(identifier, "style already injected");
            return Injection::AlreadyInjected;
        }

        let rules: Vec<String> = rules.iter().map(|r| r.as_ref().to_owned()).collect();
        debug!(identifier, rules = rules.len(), "injecting style block");
        document.append_style(StyleBlock {
            identifier: identifier.to_owned(),
            rules,
        });
        Injection::Inserted
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RegistryState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_injected_is_test_and_set() {
        let mut state = RegistryState::new();
        assert!(!state.is_injected("a"));
        assert!(state.mark_injected("a"));
        assert!(!state.mark_injected("a"));
        assert!(state.is_injected("a"));
        assert_eq!(state.injected_count(), 1);
    }

    #[test]
    fn warned_is_independent_of_injected() {
        let mut state = RegistryState::new();
        assert!(state.mark_warned("a"));
        assert!(!state.mark_warned("a"));
        assert!(!state.is_injected("a"));
    }

    #[test]
    fn sync_injected_replaces_marks_only() {
        let mut state = RegistryState::new();
        state.mark_injected("old");
        state.mark_warned("old");
        state.sync_injected(["kept"]);

        assert!(!state.is_injected("old"));
        assert!(state.is_injected("kept"));
        assert!(state.is_warned("old"));
        assert!(!state.mark_injected("kept"));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut state = RegistryState::new();
        state.mark_injected("a");
        state.mark_warned("a");
        state.clear();
        assert!(!state.is_injected("a"));
        assert!(!state.is_warned("a"));
    }

    #[test]
    fn injects_once() {
        let mut registry = StyleRegistry::new();
        let mut doc = Document::new();
        let rules = [".c { display: block; }"];

        assert_eq!(
            registry.ensure_injected(Some(&mut doc), "c", &rules),
            Injection::Inserted
        );
        assert_eq!(
            registry.ensure_injected(Some(&mut doc), "c", &rules),
            Injection::AlreadyInjected
        );
        assert_eq!(
            registry.ensure_injected(Some(&mut doc), "c", &rules),
            Injection::AlreadyInjected
        );

        assert_eq!(doc.blocks_for("c").count(), 1);
        assert_eq!(doc.head_html(), "<style>.c { display: block; }</style>");
    }

    #[test]
    fn distinct_identifiers_in_first_call_order() {
        let mut registry = StyleRegistry::new();
        let mut doc = Document::new();
        registry.ensure_injected(Some(&mut doc), "b", &[".b{}"]);
        registry.ensure_injected(Some(&mut doc), "a", &[".a{}"]);
        registry.ensure_injected(Some(&mut doc), "b", &[".b{}"]);

        let ids: Vec<&str> = doc.style_blocks().iter().map(|b| b.identifier.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn rules_keep_order_in_one_block() {
        let mut registry = StyleRegistry::new();
        let mut doc = Document::new();
        registry.ensure_injected(Some(&mut doc), "x", &[".x{color:red}", ".x:hover{color:blue}"]);
        assert_eq!(doc.style_blocks().len(), 1);
        assert_eq!(doc.style_blocks()[0].rules, vec![".x{color:red}", ".x:hover{color:blue}"]);
    }

    #[test]
    fn no_document_defers_without_marking() {
        let mut registry = StyleRegistry::new();
        assert_eq!(
            registry.ensure_injected::<&str>(None, "a", &[".a{}"]),
            Injection::Deferred
        );
        assert!(!registry.state().is_injected("a"));

        let mut doc = Document::new();
        assert_eq!(
            registry.ensure_injected(Some(&mut doc), "a", &[".a{}"]),
            Injection::Inserted
        );
    }
}
