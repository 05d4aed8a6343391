//! CSS rule matcher: resolve a property's declared value for an element.
//!
//! Every style block in the document is parsed into a rule tree and walked in
//! cascade order while a [`MatchContext`] tracks the selectors and media
//! condition each declaration sits under. A rule applies when one of its
//! selectors contains one of the element's classes, the selector text after
//! that class equals the filter's target exactly, and the innermost media
//! condition equals the filter's media exactly. Among applicable declarations
//! the last `!important` one wins, otherwise the last one.

pub mod filter;
pub mod result;

use tracing::debug;

use crate::css::model::{resolve_nested, Declaration, Rule};
use crate::css::{normalize, parse_stylesheet};
use crate::dom::{Document, NodeId};

pub use filter::{Filter, QueryError};
pub use result::{property_key, Expected, MatchResult, PropertyOutcome};

/// Check an element's declared styles against `expected`.
///
/// Missing properties, unknown elements, and unparsable injected rules give a
/// non-matching result. Only a malformed filter is an error.
pub fn query(
    document: &Document,
    element: NodeId,
    expected: &Expected,
    filter: Option<&Filter>,
) -> Result<MatchResult, QueryError> {
    let filter = validated(filter)?;
    let declarations = matching_declarations(document, element, &filter);

    let properties = expected
        .pairs()
        .into_iter()
        .map(|(name, value)| {
            let mut outcome = PropertyOutcome::new(name, value);
            let found: Vec<&Declaration> = declarations
                .iter()
                .filter(|d| d.property == outcome.property)
                .collect();
            outcome.effective = cascade_winner(&found).map(|d| d.value.clone());
            outcome.declared = found.iter().map(|d| d.value.clone()).collect();
            outcome
        })
        .collect();

    Ok(MatchResult { properties })
}

/// The effective declared value of `property` for an element, if any.
pub fn resolve(
    document: &Document,
    element: NodeId,
    property: &str,
    filter: Option<&Filter>,
) -> Result<Option<String>, QueryError> {
    let filter = validated(filter)?;
    let key = property_key(property);
    let declarations = matching_declarations(document, element, &filter);
    let found: Vec<&Declaration> = declarations.iter().filter(|d| d.property == key).collect();
    Ok(cascade_winner(&found).map(|d| d.value.clone()))
}

fn validated(filter: Option<&Filter>) -> Result<Filter, QueryError> {
    filter.map(Filter::validate).transpose().map(Option::unwrap_or_default)
}

/// Last `!important` declaration, otherwise the last declaration.
fn cascade_winner<'a>(found: &[&'a Declaration]) -> Option<&'a Declaration> {
    found
        .iter()
        .rev()
        .find(|d| d.important)
        .or_else(|| found.last())
        .copied()
}

/// All declarations that apply to `element` under `filter`, in cascade order.
fn matching_declarations(document: &Document, element: NodeId, filter: &Filter) -> Vec<Declaration> {
    let Some(el) = document.body.get(element) else {
        debug!("queried element is not in the document");
        return Vec::new();
    };

    let mut walker = RuleWalker {
        classes: &el.classes,
        filter,
        context: MatchContext::default(),
        found: Vec::new(),
    };

    for block in document.style_blocks() {
        for rule_text in &block.rules {
            match parse_stylesheet(rule_text) {
                Ok(sheet) => walker.visit_rules(&sheet.rules),
                Err(err) => {
                    debug!(identifier = %block.identifier, %err, "skipping unparsable style rule");
                }
            }
        }
    }

    walker.found
}

// ---------------------------------------------------------------------------
// MatchContext
// ---------------------------------------------------------------------------

/// One level of nesting: the resolved selectors and media condition in effect.
#[derive(Debug, Clone, Default)]
struct Frame {
    selectors: Vec<String>,
    media: Option<String>,
}

/// Stack of nesting levels a declaration sits under.
#[derive(Debug, Default)]
pub struct MatchContext {
    frames: Vec<Frame>,
}

impl MatchContext {
    /// Fully resolved selectors in effect.
    pub fn selectors(&self) -> &[String] {
        self.frames
            .last()
            .map(|f| f.selectors.as_slice())
            .unwrap_or(&[])
    }

    /// Innermost media condition in effect.
    pub fn media(&self) -> Option<&str> {
        self.frames.last().and_then(|f| f.media.as_deref())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a style rule. Nested selectors resolve against the current ones.
    pub fn push_style(&mut self, selectors: &[String]) {
        let frame = Frame {
            selectors: resolve_nested(self.selectors(), selectors),
            media: self.media().map(str::to_owned),
        };
        self.frames.push(frame);
    }

    /// Enter an `@media` block. Selectors carry over unchanged.
    pub fn push_media(&mut self, condition: &str) {
        let frame = Frame {
            selectors: self.selectors().to_vec(),
            media: Some(condition.to_owned()),
        };
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// The target of `selector` relative to `class`.
    ///
    /// `None` if the selector does not contain `.class`; `Some(None)` if the
    /// class ends the selector; otherwise the normalized text that follows it.
    pub fn target_for(selector: &str, class: &str) -> Option<Option<String>> {
        let needle = format!(".{class}");
        let mut search = 0;
        while let Some(offset) = selector[search..].find(&needle) {
            let start = search + offset;
            let end = start + needle.len();
            let at_boundary = selector[end..].chars().next().map_or(true, |c| !is_ident_char(c));
            if at_boundary {
                let rest = normalize::selector(&selector[end..]);
                return Some((!rest.is_empty()).then_some(rest));
            }
            // `.` is one byte, so this stays on a char boundary.
            search = start + 1;
        }
        None
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct RuleWalker<'a> {
    classes: &'a [String],
    filter: &'a Filter,
    context: MatchContext,
    found: Vec<Declaration>,
}

impl RuleWalker<'_> {
    fn visit_rules(&mut self, rules: &[Rule]) {
        for rule in rules {
            match rule {
                Rule::Style(style) => {
                    self.context.push_style(&style.selectors);
                    self.visit_declarations(&style.declarations);
                    self.visit_rules(&style.rules);
                    self.context.pop();
                }
                Rule::Media(media) => {
                    self.context.push_media(&media.condition);
                    self.visit_declarations(&media.declarations);
                    self.visit_rules(&media.rules);
                    self.context.pop();
                }
                Rule::At(_) => {}
            }
        }
    }

    fn visit_declarations(&mut self, declarations: &[Declaration]) {
        if declarations.is_empty() || !self.context_applies() {
            return;
        }
        self.found.extend(declarations.iter().cloned());
    }

    fn context_applies(&self) -> bool {
        if self.context.media() != self.filter.media.as_deref() {
            return false;
        }
        self.context.selectors().iter().any(|selector| {
            self.classes.iter().any(|class| {
                MatchContext::target_for(selector, class).is_some_and(|t| t == self.filter.target)
            })
        })
    }
}
