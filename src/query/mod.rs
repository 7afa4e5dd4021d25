//! Tag Query Engine
//!
//! Tag-name search with optional structural filters:
//! - prefix-with-boundary tag matching
//! - subtree flattening of every match
//! - AND-combined descendant filters

pub mod eval;
pub mod filter;
pub mod matcher;

pub use eval::find_all;
pub use filter::{Filter, Predicate};
pub use matcher::TagMatcher;
