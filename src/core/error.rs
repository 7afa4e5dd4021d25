//! Parse and query errors
//!
//! Fatal conditions abort parsing and surface as [`ParseError`]. Conditions the
//! parser can live with are collected as [`ParseWarning`] and travel with the
//! resulting document.

use std::fmt;
use std::path::PathBuf;

/// 1-based line and column of a byte in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Fatal parse failure. No partial tree is returned.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unclosed tag <{name}> opened at {position}")]
    UnclosedTag { name: String, position: Position },

    #[error("unterminated '<' at {position}")]
    UnterminatedTag { position: Position },

    #[error("malformed document at {position}: found {found:?}, expected {expected}")]
    MalformedDocument {
        found: String,
        expected: String,
        position: Position,
    },

    #[error("attribute {name:?} redefined in <{tag}> at {position}")]
    AttributeRedefinition {
        tag: String,
        name: String,
        position: Position,
    },

    #[error("closing tag </{found}> does not match <{expected}> at {position}")]
    MismatchedCloseTag {
        expected: String,
        found: String,
        position: Position,
    },
}

/// Non-fatal finding reported alongside a completed parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Open and close tag counts differ at end of input
    UnbalancedTags { opened: usize, closed: usize },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnbalancedTags { opened, closed } => {
                write!(f, "unbalanced tags: {opened} opened, {closed} closed")
            }
        }
    }
}

/// Rejected query input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid target {target:?}: a tag name needs at least two characters or angle brackets around a name")]
    InvalidTarget { target: String },
}
