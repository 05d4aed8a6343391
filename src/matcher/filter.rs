//! Query filters: pseudo-target and media condition.

use crate::css::normalize;

/// Errors from building a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid media condition '{condition}': {reason}")]
    InvalidMedia {
        condition: String,
        reason: &'static str,
    },
    #[error("invalid target '{0}': target must not be empty")]
    InvalidTarget(String),
}

/// Narrows a query to rules under a pseudo-target and/or media condition.
///
/// Both fields match exactly: a filter without a target only matches rules
/// whose selector is the bare class, and a filter without media only matches
/// rules outside any `@media` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Selector text following the class, e.g. `:hover` or `> :first-child`.
    pub target: Option<String>,
    /// Media condition, e.g. `screen` or `(min-width: 2px)`.
    pub media: Option<String>,
}

impl Filter {
    /// An empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pseudo-target (builder).
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the media condition (builder).
    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    /// Check the filter and normalize both fields.
    pub fn validate(&self) -> Result<Filter, QueryError> {
        let target = match &self.target {
            Some(target) if target.trim().is_empty() => {
                return Err(QueryError::InvalidTarget(target.clone()));
            }
            Some(target) => Some(normalize::selector(target)),
            None => None,
        };

        let media = match &self.media {
            Some(media) => Some(validate_media(media)?),
            None => None,
        };

        Ok(Filter { target, media })
    }
}

/// Validate and normalize a media condition.
fn validate_media(condition: &str) -> Result<String, QueryError> {
    let invalid = |reason| QueryError::InvalidMedia {
        condition: condition.to_owned(),
        reason,
    };

    let trimmed = condition.trim();
    if trimmed.is_empty() {
        return Err(invalid("condition is empty"));
    }
    if trimmed.starts_with('@') {
        return Err(invalid("pass the condition without the '@media' keyword"));
    }
    if trimmed.contains(['{', '}', ';']) {
        return Err(invalid("unexpected '{', '}' or ';'"));
    }

    let mut depth = 0usize;
    for c in trimmed.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid("unbalanced parentheses"))?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid("unbalanced parentheses"));
    }

    Ok(normalize::media(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_is_valid() {
        assert_eq!(Filter::new().validate().unwrap(), Filter::default());
    }

    #[test]
    fn builder_and_normalization() {
        let filter = Filter::new()
            .target("  >  :first-child ")
            .media("(min-width:2px)")
            .validate()
            .unwrap();
        assert_eq!(filter.target.as_deref(), Some(">:first-child"));
        assert_eq!(filter.media.as_deref(), Some("(min-width: 2px)"));
    }

    #[test]
    fn empty_target_rejected() {
        let err = Filter::new().target("  ").validate().unwrap_err();
        assert_eq!(err, QueryError::InvalidTarget("  ".into()));
    }

    #[test]
    fn empty_media_rejected() {
        let err = Filter::new().media("").validate().unwrap_err();
        assert!(matches!(err, QueryError::InvalidMedia { reason: "condition is empty", .. }));
    }

    #[test]
    fn unbalanced_media_rejected() {
        for media in ["(min-width: 2px", "min-width: 2px)", ")("] {
            let err = Filter::new().media(media).validate().unwrap_err();
            assert!(
                matches!(err, QueryError::InvalidMedia { reason: "unbalanced parentheses", .. }),
                "{media}"
            );
        }
    }

    #[test]
    fn block_syntax_in_media_rejected() {
        let err = Filter::new().media("screen { color: red }").validate().unwrap_err();
        assert!(err.to_string().contains("screen { color: red }"));
    }

    #[test]
    fn at_keyword_in_media_rejected() {
        assert!(Filter::new().media("@media screen").validate().is_err());
    }
}
