//! Tree node representation
//!
//! Uses NodeId (u32) for compact node references into the document arena.

use std::fmt;

use super::document::Document;
use crate::core::attributes::AttributeSet;
use crate::core::tokenizer::{Token, TokenKind};

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Id of the synthetic root; always the first arena slot
pub const ROOT: NodeId = 0;

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub token: Token,
    /// Parent node (None for the root). Never owns the parent.
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(token: Token, parent: Option<NodeId>) -> Self {
        Node {
            token,
            parent,
            children: Vec::new(),
        }
    }

    /// Create the synthetic root node
    pub fn document() -> Self {
        Node::new(Token::document(), None)
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Borrowed handle to a node. Cannot outlive its document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        debug_assert!((id as usize) < doc.len());
        NodeRef { doc, id }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn node(&self) -> &'a Node {
        self.doc.node(self.id)
    }

    #[inline]
    pub fn token(&self) -> &'a Token {
        &self.node().token
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.node().token.kind
    }

    #[inline]
    pub fn value(&self) -> &'a str {
        &self.node().token.value
    }

    #[inline]
    pub fn attributes(&self) -> &'a AttributeSet {
        &self.node().token.attributes
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef::new(self.doc, id))
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.node().children.first().map(|&id| NodeRef::new(self.doc, id))
    }

    /// Iterate over direct children
    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            ids: self.node().children.iter(),
        }
    }

    /// Iterate over all descendants in pre-order, excluding this node
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack = Vec::new();
        stack.extend(self.node().children.iter().rev().copied());
        Descendants { doc: self.doc, stack }
    }

    /// Depth below the root (root children are at depth 0)
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node().parent;
        while let Some(id) = current {
            current = self.doc.node(id).parent;
            if current.is_some() {
                depth += 1;
            }
        }
        depth
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("value", &self.value())
            .finish()
    }
}

/// Iterator over child nodes
pub struct Children<'a> {
    doc: &'a Document,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| NodeRef::new(self.doc, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

/// Pre-order iterator over descendant nodes, driven by an explicit stack
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.node(current).children.iter().rev().copied());
        Some(NodeRef::new(self.doc, current))
    }
}
