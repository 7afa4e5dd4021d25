//! Tag Matching
//!
//! Prefix-with-boundary rule: a tag value matches target `T` when it equals `T`,
//! or when `T` is a strict prefix of it and the next character is a space.
//! `"book"` therefore matches `"book id"` but not `"bookshelf"`.

use crate::core::error::QueryError;

/// A validated query target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatcher<'t> {
    name: &'t str,
}

impl<'t> TagMatcher<'t> {
    /// Validate a target, stripping one pair of surrounding angle brackets.
    ///
    /// Targets shorter than two characters are rejected, as are bracketed
    /// targets with nothing inside.
    pub fn new(target: &'t str) -> Result<Self, QueryError> {
        if target.chars().nth(1).is_none() {
            return Err(invalid(target));
        }

        let name = match target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            Some(inner) => inner,
            None => target,
        };
        if name.is_empty() {
            return Err(invalid(target));
        }

        Ok(TagMatcher { name })
    }

    /// The tag name after bracket stripping
    #[inline]
    pub fn name(&self) -> &'t str {
        self.name
    }

    #[inline]
    pub fn matches(&self, value: &str) -> bool {
        match value.strip_prefix(self.name) {
            Some(rest) => rest.is_empty() || rest.starts_with(' '),
            None => false,
        }
    }
}

fn invalid(target: &str) -> QueryError {
    QueryError::InvalidTarget {
        target: target.to_string(),
    }
}
