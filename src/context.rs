//! StyleContext: the per-document owner of injection state.
//!
//! One context is created per application/document and passed by reference to
//! render call sites. It owns the registry state, the risk detector, and the
//! live document if there is one. Without a document (server rendering)
//! injection is deferred and [`StyleContext::server_markup`] provides inline
//! `<style>` markup instead.

use tracing::debug;

use crate::config::StyleConfig;
use crate::dom::{Document, Element, NodeId, StyleBlock};
use crate::ident::{class_identifier, Identifier};
use crate::matcher::{self, Expected, Filter, MatchResult, PropertyOutcome, QueryError};
use crate::registry::{Injection, StyleRegistry};
use crate::risk::{RiskDetector, RiskDiagnostic};

// ---------------------------------------------------------------------------
// StyledElement
// ---------------------------------------------------------------------------

/// An element to mount together with the style sheets it uses.
///
/// Sheets come from the style extraction step as `(identifier, rules)` pairs
/// of already-resolved CSS text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledElement {
    pub tag: String,
    pub text: Option<String>,
    /// Plain (non-generated) classes.
    pub classes: Vec<String>,
    /// `(identifier, rules)` pairs in declaration order.
    pub sheets: Vec<(String, Vec<String>)>,
}

impl StyledElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            classes: Vec::new(),
            sheets: Vec::new(),
        }
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a plain class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add a resolved sheet (builder).
    pub fn with_sheet<R>(mut self, identifier: impl AsRef<str>, rules: impl IntoIterator<Item = R>) -> Self
    where
        R: Into<String>,
    {
        self.sheets.push((
            identifier.as_ref().to_owned(),
            rules.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add a flat declaration block such as `font-size:12px;`, hashed into a
    /// class identifier and wrapped in a single rule (builder).
    pub fn with_css(self, declarations: &str) -> Self {
        let id = class_identifier(declarations);
        let rule = format!(".{id}{{{declarations}}}");
        self.with_sheet(id, [rule])
    }

    /// Identifier of the sheet at `index`.
    pub fn sheet_identifier(&self, index: usize) -> Option<&str> {
        self.sheets.get(index).map(|(id, _)| id.as_str())
    }
}

// ---------------------------------------------------------------------------
// StyleContext
// ---------------------------------------------------------------------------

/// Owns injection state for one application/document session.
#[derive(Debug)]
pub struct StyleContext {
    config: StyleConfig,
    registry: StyleRegistry,
    detector: RiskDetector,
    document: Option<Document>,
}

impl StyleContext {
    /// A context without a document (server rendering).
    pub fn new(config: StyleConfig) -> Self {
        let detector = RiskDetector::new(config.mode);
        Self {
            config,
            registry: StyleRegistry::new(),
            detector,
            document: None,
        }
    }

    /// A context rendering into `document`.
    pub fn with_document(config: StyleConfig, document: Document) -> Self {
        let mut context = Self::new(config);
        context.attach_document(document);
        context
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    /// Attach a live document, returning the previous one.
    ///
    /// The injected set is rebuilt from the style blocks `document` already
    /// holds, so identifiers written only into the previous document are
    /// injected again. Warnings already issued stay recorded.
    pub fn attach_document(&mut self, document: Document) -> Option<Document> {
        self.registry.state_mut().sync_injected(
            document
                .style_blocks()
                .iter()
                .map(|block| block.identifier.as_str()),
        );
        self.document.replace(document)
    }

    pub fn detach_document(&mut self) -> Option<Document> {
        self.document.take()
    }

    /// Inject `rules` for `identifier` at most once per session.
    pub fn ensure_injected<S: AsRef<str>>(&mut self, identifier: &str, rules: &[S]) -> Injection {
        self.registry
            .ensure_injected(self.document.as_mut(), identifier, rules)
    }

    /// Report positional pseudo-classes in `rules` once per identifier
    /// (development mode only).
    pub fn risky_check<S: AsRef<str>>(&mut self, identifier: &str, rules: &[S]) -> Option<RiskDiagnostic> {
        self.detector
            .check(self.registry.state_mut(), identifier, rules)
    }

    /// Render one sheet: risk check, then inject.
    pub fn render_style<S: AsRef<str>>(&mut self, identifier: &str, rules: &[S]) -> Injection {
        self.risky_check(identifier, rules);
        self.ensure_injected(identifier, rules)
    }

    /// Inline `<style>` markup for rendering without a document.
    ///
    /// Runs the risk check but does not touch the registry's injected set.
    pub fn server_markup<S: AsRef<str>>(&mut self, identifier: &str, rules: &[S]) -> String {
        self.risky_check(identifier, rules);
        StyleBlock {
            identifier: identifier.to_owned(),
            rules: rules.iter().map(|r| r.as_ref().to_owned()).collect(),
        }
        .to_html()
    }

    /// Render `element`'s sheets and insert it into the document body.
    ///
    /// Sheet identifiers become classes after the plain classes, in sheet
    /// order. Returns `None` without a document or if `parent` is missing.
    pub fn mount(&mut self, parent: Option<NodeId>, element: StyledElement) -> Option<NodeId> {
        for (identifier, rules) in &element.sheets {
            self.render_style(identifier, rules);
        }

        let document = self.document.as_mut()?;
        let mut node = Element::new(element.tag)
            .with_classes(&element.classes)
            .with_classes(element.sheets.iter().map(|(id, _)| id));
        node.text = element.text;

        let id = match parent {
            Some(parent) => document.body.insert_child(parent, node)?,
            None => document.body.insert(node),
        };
        debug!(classes = %document.body.get(id).map(Element::class_name).unwrap_or_default(), "mounted element");
        Some(id)
    }

    /// Remove an element and its subtree. Injected styles stay.
    pub fn unmount(&mut self, node: NodeId) -> bool {
        self.document
            .as_mut()
            .and_then(|doc| doc.body.remove(node))
            .is_some()
    }

    /// Match an element's declared styles. Without a document nothing matches.
    pub fn query(
        &self,
        element: NodeId,
        expected: &Expected,
        filter: Option<&Filter>,
    ) -> Result<MatchResult, QueryError> {
        match &self.document {
            Some(document) => matcher::query(document, element, expected, filter),
            None => {
                if let Some(filter) = filter {
                    filter.validate()?;
                }
                Ok(MatchResult {
                    properties: expected
                        .pairs()
                        .into_iter()
                        .map(|(name, value)| PropertyOutcome::new(name, value))
                        .collect(),
                })
            }
        }
    }

    /// Forget all injected and warned identifiers. For external teardown
    /// only; the document's existing style blocks are left in place.
    pub fn reset(&mut self) {
        self.registry.state_mut().clear();
    }

    /// Class identifier for a flat declaration block.
    pub fn class_for(&self, css: &str) -> Identifier {
        class_identifier(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;

    fn dev_with_document() -> StyleContext {
        StyleContext::with_document(StyleConfig::development(), Document::new())
    }

    #[test]
    fn new_has_no_document() {
        let ctx = StyleContext::new(StyleConfig::default());
        assert!(ctx.document().is_none());
        assert_eq!(ctx.config().mode, Mode::Development);
    }

    #[test]
    fn ensure_injected_through_context() {
        let mut ctx = dev_with_document();
        assert_eq!(ctx.ensure_injected("a", &[".a{}"]), Injection::Inserted);
        assert_eq!(ctx.ensure_injected("a", &[".a{}"]), Injection::AlreadyInjected);
        assert_eq!(ctx.document().unwrap().style_blocks().len(), 1);
    }

    #[test]
    fn deferred_until_document_attached() {
        let mut ctx = StyleContext::new(StyleConfig::development());
        assert_eq!(ctx.ensure_injected("a", &[".a{}"]), Injection::Deferred);
        assert!(ctx.attach_document(Document::new()).is_none());
        assert_eq!(ctx.ensure_injected("a", &[".a{}"]), Injection::Inserted);
    }

    #[test]
    fn replacing_document_reinjects() {
        let mut ctx = dev_with_document();
        let el = StyledElement::new("div").with_css("color:red;");
        ctx.mount(None, el.clone()).unwrap();

        let old = ctx.attach_document(Document::new()).unwrap();
        assert_eq!(old.style_blocks().len(), 1);

        let id = ctx.mount(None, el).unwrap();
        assert_eq!(ctx.document().unwrap().style_blocks().len(), 1);
        assert!(ctx
            .query(id, &Expected::property("color", "red"), None)
            .unwrap()
            .matched());
        assert_eq!(ctx.ensure_injected("cc-55fb5l", &[".cc-55fb5l{color:red;}"]), Injection::AlreadyInjected);
    }

    #[test]
    fn replacing_document_keeps_warnings() {
        let mut ctx = dev_with_document();
        let rules = [".c:first-child{display:block}"];
        assert!(ctx.risky_check("c", &rules).is_some());
        ctx.attach_document(Document::new());
        assert!(ctx.risky_check("c", &rules).is_none());
    }

    #[test]
    fn attached_document_with_blocks_is_not_reinjected() {
        let mut ctx = dev_with_document();
        ctx.ensure_injected("a", &[".a{}"]);
        let prepared = ctx.detach_document().unwrap();

        let mut fresh = StyleContext::with_document(StyleConfig::development(), prepared);
        assert_eq!(fresh.ensure_injected("a", &[".a{}"]), Injection::AlreadyInjected);
        assert_eq!(fresh.ensure_injected("b", &[".b{}"]), Injection::Inserted);
    }

    #[test]
    fn with_css_builds_sheet() {
        let el = StyledElement::new("div").with_css("font-size:12px;");
        assert_eq!(el.sheet_identifier(0), Some("cc-1rr6d23"));
        assert_eq!(el.sheets[0].1, vec![".cc-1rr6d23{font-size:12px;}"]);
    }

    #[test]
    fn mount_assigns_classes_in_order() {
        let mut ctx = dev_with_document();
        let el = StyledElement::new("div")
            .with_class("plain")
            .with_sheet("cc-b", [".cc-b{color:red}"])
            .with_sheet("cc-a", [".cc-a{color:blue}"]);
        let id = ctx.mount(None, el).unwrap();

        let doc = ctx.document().unwrap();
        assert_eq!(doc.body.get(id).unwrap().classes, vec!["plain", "cc-b", "cc-a"]);
        assert_eq!(doc.style_blocks().len(), 2);
    }

    #[test]
    fn mount_under_parent() {
        let mut ctx = dev_with_document();
        let parent = ctx.mount(None, StyledElement::new("section")).unwrap();
        let child = ctx
            .mount(Some(parent), StyledElement::new("p").with_text("x"))
            .unwrap();
        assert_eq!(ctx.document().unwrap().body.parent(child), Some(parent));
    }

    #[test]
    fn mount_without_document() {
        let mut ctx = StyleContext::new(StyleConfig::development());
        assert!(ctx.mount(None, StyledElement::new("div").with_css("color:red;")).is_none());
        assert!(!ctx.registry().state().is_injected("cc-55fb5l"));
    }

    #[test]
    fn unmount_keeps_styles() {
        let mut ctx = dev_with_document();
        let id = ctx
            .mount(None, StyledElement::new("div").with_css("color:red;"))
            .unwrap();
        assert!(ctx.unmount(id));
        assert!(!ctx.unmount(id));

        let doc = ctx.document().unwrap();
        assert!(doc.body.is_empty());
        assert_eq!(doc.style_blocks().len(), 1);
    }

    #[test]
    fn remount_does_not_reinject() {
        let mut ctx = dev_with_document();
        let el = StyledElement::new("div").with_css("color:red;");
        let first = ctx.mount(None, el.clone()).unwrap();
        ctx.unmount(first);
        ctx.mount(None, el).unwrap();
        assert_eq!(ctx.document().unwrap().style_blocks().len(), 1);
    }

    #[test]
    fn server_markup_inlines_style() {
        let mut ctx = StyleContext::new(StyleConfig::production());
        let html = ctx.server_markup("cc-a", &[".cc-a{color:red}"]);
        assert_eq!(html, "<style>.cc-a{color:red}</style>");
        assert!(!ctx.registry().state().is_injected("cc-a"));
    }

    #[test]
    fn render_style_warns_then_injects() {
        let mut ctx = dev_with_document();
        let rules = [".c:first-child { display: block; }"];
        assert_eq!(ctx.render_style("c", &rules), Injection::Inserted);
        assert!(ctx.registry().state().is_warned("c"));
        assert!(ctx.risky_check("c", &rules).is_none());
    }

    #[test]
    fn query_without_document_is_not_found() {
        let ctx = StyleContext::new(StyleConfig::development());
        let mut other = Document::new();
        let el = other.body.insert(Element::new("div"));
        let result = ctx.query(el, &Expected::property("color", "red"), None).unwrap();
        assert!(!result.matched());
        assert!(ctx
            .query(el, &Expected::property("color", "red"), Some(&Filter::new().media("(")))
            .is_err());
    }

    #[test]
    fn reset_forgets_registry() {
        let mut ctx = dev_with_document();
        ctx.ensure_injected("a", &[".a{}"]);
        ctx.reset();
        assert_eq!(ctx.ensure_injected("a", &[".a{}"]), Injection::Inserted);
        assert_eq!(ctx.document().unwrap().style_blocks().len(), 2);
    }

    #[test]
    fn class_for_matches_identifier() {
        let ctx = dev_with_document();
        assert_eq!(ctx.class_for("color:red;").as_str(), "cc-55fb5l");
    }
}
