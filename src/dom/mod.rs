//! DOM Module - Arena-based document tree
//!
//! - Arena allocation for nodes
//! - NodeId (u32) indices for children and parent links
//! - Borrowed `NodeRef` handles for traversal and query results

pub mod builder;
pub mod document;
pub mod node;

pub use builder::TreeBuilder;
pub use document::Document;
pub use node::{Children, Descendants, Node, NodeId, NodeRef, ROOT};
