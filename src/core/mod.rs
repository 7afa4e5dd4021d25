//! Core parsing primitives
//!
//! - Scanner: memchr-accelerated delimiter detection
//! - Tokenizer: expectation-driven state machine producing tokens
//! - Attributes: name-ordered, duplicate-free attribute sets
//! - Error: fatal parse errors, warnings and query errors
//! - Options: lenient/strict parser configuration

pub mod attributes;
pub mod error;
pub mod options;
pub mod scanner;
pub mod tokenizer;
