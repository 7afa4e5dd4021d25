//! Tree Builder
//!
//! Folds the token stream into the node arena. Open and close markers both
//! become nodes, so the tree keeps the shape of the source text:
//!
//! ```text
//! <a>t</a>   =>   root
//!                   a
//!                     t
//!                     /a
//! ```

use super::node::{Node, NodeId, ROOT};
use crate::core::tokenizer::{Token, TokenKind};

const LOG_TARGET: &str = "xmlquery.tree_builder";

/// Builds the node arena one token at a time
pub struct TreeBuilder {
    nodes: Vec<Node>,
    cursor: NodeId,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size the arena; the root takes one extra slot
    pub fn with_capacity(tokens: usize) -> Self {
        let mut nodes = Vec::with_capacity(tokens + 1);
        nodes.push(Node::document());
        TreeBuilder { nodes, cursor: ROOT }
    }

    /// Node that receives the next child
    #[inline]
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn push(&mut self, token: Token) {
        log::trace!(
            target: LOG_TARGET,
            "{:?} {:?} under node {}",
            token.kind,
            token.value,
            self.cursor
        );

        match token.kind {
            TokenKind::TagOpen => {
                self.cursor = self.append(token);
            }
            TokenKind::TagClose => {
                self.append(token);
                // An unmatched close at the root leaves the cursor where it is
                if let Some(parent) = self.nodes[self.cursor as usize].parent {
                    self.cursor = parent;
                }
            }
            TokenKind::Text | TokenKind::Meta => {
                self.append(token);
            }
            TokenKind::Document => unreachable!("document token inside a token stream"),
        }
    }

    /// Append a node under the cursor and return its id
    fn append(&mut self, token: Token) -> NodeId {
        let id = NodeId::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("node arena exceeds {} entries", NodeId::MAX));
        self.nodes.push(Node::new(token, Some(self.cursor)));
        self.nodes[self.cursor as usize].children.push(id);
        id
    }

    /// Finish building and hand over the arena (root at index 0)
    pub fn finish(self) -> Vec<Node> {
        self.nodes
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an arena from a complete token sequence
pub fn build(tokens: Vec<Token>) -> Vec<Node> {
    let mut builder = TreeBuilder::with_capacity(tokens.len());
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}
