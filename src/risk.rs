//! Pseudo-selector risk detector.
//!
//! A content-addressed class is shared by every element whose styles hash the
//! same, wherever those elements sit in the tree. Positional pseudo-classes
//! such as `:first-child` select by tree position instead, and injected
//! `<style>` siblings shift that position during server rendering. The
//! detector reports such selectors once per identifier, in development only.
//! It never blocks injection.

use std::fmt;

use tracing::{debug, warn};

use crate::config::Mode;
use crate::css::{parse_stylesheet, Rule};
use crate::registry::RegistryState;

/// Pseudo-classes whose meaning depends on element position.
pub const POSITIONAL_PSEUDO_CLASSES: &[&str] = &[
    ":first-child",
    ":last-child",
    ":only-child",
    ":nth-child(",
    ":nth-last-child(",
    ":first-of-type",
    ":last-of-type",
    ":only-of-type",
    ":nth-of-type(",
    ":nth-last-of-type(",
];

/// An advisory report about a risky style block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskDiagnostic {
    /// Identifier of the style block.
    pub identifier: String,
    /// Positional pseudo-classes found, in table order.
    pub pseudo_classes: Vec<String>,
}

impl fmt::Display for RiskDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .pseudo_classes
            .iter()
            .map(|p| p.trim_end_matches('('))
            .collect();
        write!(
            f,
            "style \"{}\" uses the positional pseudo-class(es) \"{}\"; \
             elements sharing this class may sit at different positions, \
             and injected <style> elements change sibling positions when rendered on the server",
            self.identifier,
            names.join(", ")
        )
    }
}

/// Scans rule text for positional pseudo-classes.
#[derive(Debug, Clone, Copy)]
pub struct RiskDetector {
    mode: Mode,
}

impl RiskDetector {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Report risky selectors in `rules`, at most once per identifier.
    ///
    /// Returns the diagnostic that was emitted, if any. Does nothing in
    /// production mode.
    pub fn check<S: AsRef<str>>(
        &self,
        state: &mut RegistryState,
        identifier: &str,
        rules: &[S],
    ) -> Option<RiskDiagnostic> {
        if self.mode.is_production() || state.is_warned(identifier) {
            return None;
        }

        let found = positional_pseudo_classes(rules);
        if found.is_empty() || !state.mark_warned(identifier) {
            return None;
        }

        let diagnostic = RiskDiagnostic {
            identifier: identifier.to_owned(),
            pseudo_classes: found.into_iter().map(str::to_owned).collect(),
        };
        warn!(identifier, "{diagnostic}");
        Some(diagnostic)
    }
}

/// Positional pseudo-classes used by the selectors in `rules`.
///
/// Only selectors are scanned, nested ones included; declaration values and
/// at-rule preludes are not. A rule that does not parse is scanned as raw
/// text instead.
pub fn positional_pseudo_classes<S: AsRef<str>>(rules: &[S]) -> Vec<&'static str> {
    let mut selectors = Vec::new();
    for rule in rules {
        let rule = rule.as_ref();
        match parse_stylesheet(rule) {
            Ok(sheet) => collect_selectors(&sheet.rules, &mut selectors),
            Err(err) => {
                debug!(%err, "scanning unparsable rule text for positional pseudo-classes");
                selectors.push(rule.to_owned());
            }
        }
    }

    POSITIONAL_PSEUDO_CLASSES
        .iter()
        .copied()
        .filter(|pseudo| selectors.iter().any(|selector| selector.contains(pseudo)))
        .collect()
}

fn collect_selectors(rules: &[Rule], out: &mut Vec<String>) {
    for rule in rules {
        match rule {
            Rule::Style(style) => {
                out.extend(style.selectors.iter().cloned());
                collect_selectors(&style.rules, out);
            }
            Rule::Media(media) => collect_selectors(&media.rules, out),
            Rule::At(at) => collect_selectors(&at.rules, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RISKY: &[&str] = &[".c:first-child { display: block; }"];
    const SAFE: &[&str] = &[".c:hover { display: block; }"];

    #[test]
    fn finds_positional_pseudo_classes() {
        assert_eq!(positional_pseudo_classes(RISKY), vec![":first-child"]);
        assert!(positional_pseudo_classes(SAFE).is_empty());
        assert_eq!(
            positional_pseudo_classes(&[".a:nth-last-child(2){}", ".a:last-of-type{}"]),
            vec![":nth-last-child(", ":last-of-type"]
        );
    }

    #[test]
    fn nth_last_child_is_not_last_child() {
        assert_eq!(
            positional_pseudo_classes(&[".a:nth-last-child(2){}"]),
            vec![":nth-last-child("]
        );
    }

    #[test]
    fn values_and_strings_are_not_selectors() {
        assert!(positional_pseudo_classes(&[".cc-q{content:\":first-child\"}"]).is_empty());
        assert!(positional_pseudo_classes(&["@media screen{.cc-q{content:':last-child'}}"]).is_empty());

        let detector = RiskDetector::new(Mode::Development);
        let mut state = RegistryState::new();
        assert!(detector
            .check(&mut state, "cc-q", &[".cc-q{content:\":first-child\"}"])
            .is_none());
        assert!(!state.is_warned("cc-q"));
    }

    #[test]
    fn nested_selectors_are_scanned() {
        assert_eq!(
            positional_pseudo_classes(&[".cc-n{color:red;&:only-child{color:blue}}"]),
            vec![":only-child"]
        );
        assert_eq!(
            positional_pseudo_classes(&["@media screen{.cc-n > :nth-of-type(2n){margin:0}}"]),
            vec![":nth-of-type("]
        );
    }

    #[test]
    fn unparsable_rule_scanned_as_text() {
        assert_eq!(
            positional_pseudo_classes(&[".cc-x:first-child{color:red"]),
            vec![":first-child"]
        );
    }

    #[test]
    fn warns_once_in_development() {
        let detector = RiskDetector::new(Mode::Development);
        let mut state = RegistryState::new();

        let first = detector.check(&mut state, "c", RISKY);
        assert_eq!(
            first,
            Some(RiskDiagnostic {
                identifier: "c".into(),
                pseudo_classes: vec![":first-child".into()],
            })
        );
        assert!(detector.check(&mut state, "c", RISKY).is_none());
        assert!(state.is_warned("c"));
    }

    #[test]
    fn silent_in_production() {
        let detector = RiskDetector::new(Mode::Production);
        let mut state = RegistryState::new();
        assert!(detector.check(&mut state, "c", RISKY).is_none());
        assert!(!state.is_warned("c"));
    }

    #[test]
    fn safe_rules_are_not_marked() {
        let detector = RiskDetector::new(Mode::Development);
        let mut state = RegistryState::new();
        assert!(detector.check(&mut state, "c", SAFE).is_none());
        assert!(!state.is_warned("c"));
    }

    #[test]
    fn separate_identifiers_warn_separately() {
        let detector = RiskDetector::new(Mode::Development);
        let mut state = RegistryState::new();
        assert!(detector.check(&mut state, "a", RISKY).is_some());
        assert!(detector.check(&mut state, "b", RISKY).is_some());
    }

    #[test]
    fn diagnostic_message_names_selector() {
        let diagnostic = RiskDiagnostic {
            identifier: "cc-abc".into(),
            pseudo_classes: vec![":first-child".into(), ":nth-child(".into()],
        };
        let message = diagnostic.to_string();
        assert!(message.contains("cc-abc"));
        assert!(message.contains(":first-child, :nth-child"));
    }
}
