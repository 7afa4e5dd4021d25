//! Document - arena-backed markup tree
//!
//! All nodes live in one `Vec<Node>` owned by the document. Children are
//! stored as `NodeId` lists and parents as plain indices, so dropping the
//! document frees the whole tree and no node ever owns its parent.

use super::builder;
use super::node::{Node, NodeId, NodeRef, ROOT};
use crate::core::error::{ParseError, ParseWarning, QueryError};
use crate::core::options::ParseOptions;
use crate::core::tokenizer::{self, TokenKind, TokenStream};
use crate::query::{self, Filter};

/// Indent unit used by [`Document::render`]
const INDENT: &str = "  ";

/// A parsed document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    warnings: Vec<ParseWarning>,
}

impl Document {
    /// Parse a document from text (lenient mode)
    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        Self::parse_str_with(input, ParseOptions::new())
    }

    /// Parse a document from text in strict mode
    pub fn parse_str_strict(input: &str) -> Result<Self, ParseError> {
        Self::parse_str_with(input, ParseOptions::strict())
    }

    pub fn parse_str_with(input: &str, options: ParseOptions) -> Result<Self, ParseError> {
        let stream = tokenizer::tokenize_with(input, options)?;
        let doc = Self::from_tokens(stream);
        log::debug!(
            target: "xmlquery.document",
            "built document with {} nodes, {} warnings",
            doc.node_count(),
            doc.warnings.len()
        );
        Ok(doc)
    }

    /// Build the tree from an already tokenized stream
    pub fn from_tokens(stream: TokenStream) -> Self {
        Document {
            nodes: builder::build(stream.tokens),
            warnings: stream.warnings,
        }
    }

    /// The synthetic root
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, ROOT)
    }

    /// Get a node handle by id
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        if (id as usize) < self.nodes.len() {
            Some(NodeRef::new(self, id))
        } else {
            None
        }
    }

    /// Arena access for ids handed out by this document
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Number of nodes, the synthetic root included
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes below the root
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True when nothing but the root exists
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Non-fatal findings from parsing
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Select every node whose tag matches `target`, each followed by its subtree
    pub fn find_all(&self, target: &str) -> Result<Vec<NodeRef<'_>>, QueryError> {
        query::find_all(self, target, &[])
    }

    /// Like [`find_all`](Self::find_all), keeping matches that satisfy `filter`
    pub fn find_all_with_filter(
        &self,
        target: &str,
        filter: &Filter,
    ) -> Result<Vec<NodeRef<'_>>, QueryError> {
        query::find_all(self, target, std::slice::from_ref(filter))
    }

    /// Like [`find_all`](Self::find_all), keeping matches that satisfy every filter
    pub fn find_all_with_filters(
        &self,
        target: &str,
        filters: &[Filter],
    ) -> Result<Vec<NodeRef<'_>>, QueryError> {
        query::find_all(self, target, filters)
    }

    /// Render the tree as indented text, one node per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeId, usize)> = self.nodes[ROOT as usize]
            .children
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            for _ in 0..depth {
                out.push_str(INDENT);
            }
            match node.kind() {
                TokenKind::TagOpen | TokenKind::TagClose => {
                    out.push('<');
                    out.push_str(&node.token.value);
                    out.push('>');
                }
                TokenKind::Text | TokenKind::Meta => out.push_str(&node.token.value),
                TokenKind::Document => unreachable!("document node below the root"),
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_tree() {
        let doc = Document::parse_str("<library><book id=\"1\">Dune</book></library>").unwrap();
        assert_eq!(doc.node_count(), 5);
        assert!(doc.warnings().is_empty());

        let library = doc.root().first_child().unwrap();
        assert_eq!(library.kind(), TokenKind::TagOpen);
        assert_eq!(library.value(), "library");

        let book = library.first_child().unwrap();
        assert_eq!(book.attributes().get("id"), Some("1"));
        let children: Vec<&str> = book.children().map(|n| n.value()).collect();
        assert_eq!(children, vec!["Dune", "/book"]);
    }

    #[test]
    fn test_unmatched_close_keeps_tree_and_warns() {
        let doc = Document::parse_str("<a></a></a>").unwrap();
        let top: Vec<&str> = doc.root().children().map(|n| n.value()).collect();
        assert_eq!(top, vec!["a", "/a"]);
        assert_eq!(
            doc.warnings(),
            &[ParseWarning::UnbalancedTags { opened: 1, closed: 2 }]
        );
    }

    #[test]
    fn test_fatal_errors_propagate() {
        assert!(matches!(
            Document::parse_str("<a x=\"1\" x=\"2\">"),
            Err(ParseError::AttributeRedefinition { .. })
        ));
        assert!(matches!(
            Document::parse_str("<a"),
            Err(ParseError::UnclosedTag { .. })
        ));
        assert!(matches!(
            Document::parse_str_strict("<a></b>"),
            Err(ParseError::MismatchedCloseTag { .. })
        ));
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse_str("   \n").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.render(), "");
        assert!(doc.get(1).is_none());
    }

    #[test]
    fn test_render() {
        let doc = Document::parse_str("<?xml version=\"1.0\"?>\n<a><b>t</b><c/></a>").unwrap();
        let expected = "\
<?xml version=\"1.0\"?>
<a>
  <b>
    t
    </b>
  <c>
    </>
  </a>
";
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn test_render_round_trips_names_and_text() {
        let input = "<library>\n  <book>\n    <title>Dune</title>\n  </book>\n  <book><title>Foo</title></book>\n</library>";
        let doc = Document::parse_str(input).unwrap();

        let source: Vec<String> = tokenizer::tokenize(input)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| match t.kind {
                TokenKind::TagOpen | TokenKind::TagClose => format!("<{}>", t.value),
                _ => t.value,
            })
            .collect();
        let rendered: Vec<String> = doc
            .render()
            .lines()
            .map(|line| line.trim().to_string())
            .collect();

        assert_eq!(rendered, source);
    }
}
