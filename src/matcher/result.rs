//! Query expectations and structured results.

use std::fmt;

use crate::css::normalize;
use crate::ident::kebab_case;

/// What a query expects to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// One property with one value.
    Property { name: String, value: String },
    /// Several properties; all must match.
    Map(Vec<(String, String)>),
}

impl Expected {
    pub fn property(name: impl Into<String>, value: impl Into<String>) -> Self {
        Expected::Property {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn map<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Expected::Map(
            pairs
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }

    /// The `(name, value)` pairs as written.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        match self {
            Expected::Property { name, value } => vec![(name.as_str(), value.as_str())],
            Expected::Map(pairs) => pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())).collect(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Expected {
    fn from((name, value): (N, V)) -> Self {
        Expected::property(name, value)
    }
}

/// Canonical property key: kebab-case, lowercased unless a custom property.
pub fn property_key(name: &str) -> String {
    let kebab = kebab_case(name.trim());
    if kebab.starts_with("--") {
        kebab
    } else {
        kebab.to_ascii_lowercase()
    }
}

/// Outcome for one expected property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyOutcome {
    /// Canonical (kebab-case) property name.
    pub property: String,
    /// Normalized expected value.
    pub expected: String,
    /// The cascade winner among matching declarations.
    pub effective: Option<String>,
    /// Every matching declared value, in cascade order.
    pub declared: Vec<String>,
}

impl PropertyOutcome {
    pub(crate) fn new(name: &str, value: &str) -> Self {
        Self {
            property: property_key(name),
            expected: normalize::value(value),
            effective: None,
            declared: Vec::new(),
        }
    }

    pub fn matched(&self) -> bool {
        self.effective.as_deref() == Some(self.expected.as_str())
    }
}

/// Result of a query. Never an error for missing properties or elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub properties: Vec<PropertyOutcome>,
}

impl MatchResult {
    /// Whether every expected property matched.
    pub fn matched(&self) -> bool {
        self.properties.iter().all(PropertyOutcome::matched)
    }

    /// Outcomes that did not match.
    pub fn mismatches(&self) -> impl Iterator<Item = &PropertyOutcome> {
        self.properties.iter().filter(|p| !p.matched())
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched() {
            let found: Vec<String> = self
                .properties
                .iter()
                .map(|p| format!("{}: {}", p.property, p.expected))
                .collect();
            return write!(f, "found {}", found.join("; "));
        }

        let mut first = true;
        for outcome in self.mismatches() {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(
                f,
                "expected \"{}: {}\", ",
                outcome.property, outcome.expected
            )?;
            if outcome.declared.is_empty() {
                write!(f, "found no \"{}\" declarations", outcome.property)?;
            } else {
                let found: Vec<String> = outcome
                    .declared
                    .iter()
                    .map(|v| format!("{}: {}", outcome.property, v))
                    .collect();
                write!(f, "found {}", found.join(", "))?;
            }
        }
        Ok(())
    }
}
