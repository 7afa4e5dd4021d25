//! Query Evaluation
//!
//! Walks the whole tree in pre-order and compares every node's value against
//! the target, whatever its kind. A match contributes itself followed by its
//! entire subtree, and the walk keeps descending into matches, so a match
//! nested inside another match shows up in both subtrees.

use super::filter::{satisfies_all, Filter};
use super::matcher::TagMatcher;
use crate::core::error::QueryError;
use crate::dom::{Document, NodeRef};

/// Find every node whose value matches `target` and that satisfies all
/// `filters`, flattening each match with its descendants
#[must_use = "query results should be used"]
pub fn find_all<'a>(
    doc: &'a Document,
    target: &str,
    filters: &[Filter],
) -> Result<Vec<NodeRef<'a>>, QueryError> {
    let matcher = TagMatcher::new(target)?;
    let mut results = Vec::new();

    for node in doc.root().descendants() {
        if matcher.matches(node.value()) && satisfies_all(node, filters) {
            results.push(node);
            results.extend(node.descendants());
        }
    }

    log::debug!(
        target: "xmlquery.query",
        "find_all({:?}, {} filters) -> {} nodes",
        matcher.name(),
        filters.len(),
        results.len()
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::TokenKind;

    const LIBRARY: &str = r#"<library><book id="1">Dune</book><bookshelf>X</bookshelf></library>"#;
    const TITLES: &str =
        "<library><book><title>Dune</title></book><book><title>Foo</title></book></library>";

    fn values<'a>(nodes: &[NodeRef<'a>]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.value()).collect()
    }

    #[test]
    fn test_match_selects_subtree() {
        let doc = Document::parse_str(LIBRARY).unwrap();
        let results = doc.find_all("book").unwrap();
        assert_eq!(values(&results), vec!["book", "Dune", "/book"]);
        assert_eq!(results[0].attributes().get("id"), Some("1"));
    }

    #[test]
    fn test_bracketed_target_is_equivalent() {
        let doc = Document::parse_str(LIBRARY).unwrap();
        assert_eq!(doc.find_all("<book>").unwrap(), doc.find_all("book").unwrap());
    }

    #[test]
    fn test_no_match_is_empty() {
        let doc = Document::parse_str(LIBRARY).unwrap();
        assert!(doc.find_all("magazine").unwrap().is_empty());
        assert!(doc.find_all("Dun").unwrap().is_empty());
    }

    #[test]
    fn test_every_node_kind_is_compared() {
        let doc =
            Document::parse_str("<library><book>title</book><note>book</note></library>").unwrap();

        let results = doc.find_all("book").unwrap();
        assert_eq!(values(&results), vec!["book", "title", "/book", "book"]);
        assert_eq!(results[3].kind(), TokenKind::Text);

        assert_eq!(values(&doc.find_all("/book").unwrap()), vec!["/book"]);
        assert_eq!(values(&doc.find_all("title").unwrap()), vec!["title"]);
    }

    #[test]
    fn test_text_match_uses_boundary_rule() {
        let doc = Document::parse_str(LIBRARY).unwrap();
        let results = doc.find_all("Dune").unwrap();
        assert_eq!(values(&results), vec!["Dune"]);
        assert_eq!(results[0].kind(), TokenKind::Text);

        let doc = Document::parse_str("<p>book club</p><p>bookish</p>").unwrap();
        assert_eq!(values(&doc.find_all("book").unwrap()), vec!["book club"]);
    }

    #[test]
    fn test_invalid_target() {
        let doc = Document::parse_str(LIBRARY).unwrap();
        assert!(matches!(
            doc.find_all("b"),
            Err(QueryError::InvalidTarget { .. })
        ));
        assert!(doc.find_all("").is_err());
        assert!(doc.find_all("<>").is_err());
    }

    #[test]
    fn test_nested_matches_repeat() {
        let doc = Document::parse_str("<div><div>x</div></div>").unwrap();
        let results = doc.find_all("div").unwrap();
        assert_eq!(
            values(&results),
            vec!["div", "div", "x", "/div", "/div", "div", "x", "/div"]
        );
    }

    #[test]
    fn test_single_filter() {
        let doc = Document::parse_str(TITLES).unwrap();
        let filter = Filter::new("title", |v| v == "Dune");
        let results = doc.find_all_with_filter("book", &filter).unwrap();
        assert_eq!(values(&results), vec!["book", "title", "Dune", "/title", "/book"]);
        assert_eq!(results[0], doc.find_all("book").unwrap()[0]);
    }

    #[test]
    fn test_filters_are_combined_with_and() {
        let doc = Document::parse_str(
            "<shop>\
               <book><title>Dune</title><year>1965</year></book>\
               <book><title>Dune</title><year>2021</year></book>\
             </shop>",
        )
        .unwrap();
        let filters = [
            Filter::equals("title", "Dune"),
            Filter::equals("year", "1965"),
        ];

        let results = doc.find_all_with_filters("book", &filters).unwrap();
        let books: Vec<_> = results.iter().filter(|n| n.value() == "book").collect();
        assert_eq!(books.len(), 1);
        assert!(values(&results).contains(&"1965"));
        assert!(!values(&results).contains(&"2021"));
    }

    #[test]
    fn test_failing_candidate_does_not_stop_the_walk() {
        let doc = Document::parse_str(
            "<shop>\
               <book><title>Dune</title><year>2021</year></book>\
               <book><title>Dune</title><year>1965</year></book>\
             </shop>",
        )
        .unwrap();
        let filters = [
            Filter::equals("title", "Dune"),
            Filter::equals("year", "1965"),
        ];

        let results = doc.find_all_with_filters("book", &filters).unwrap();
        assert_eq!(
            values(&results),
            vec!["book", "title", "Dune", "/title", "year", "1965", "/year", "/book"]
        );
        assert_eq!(results[0], doc.find_all("book").unwrap()[8]);
    }

    #[test]
    fn test_empty_filter_list_matches_like_unfiltered() {
        let doc = Document::parse_str(TITLES).unwrap();
        assert_eq!(
            doc.find_all_with_filters("book", &[]).unwrap(),
            doc.find_all("book").unwrap()
        );
    }

    #[test]
    fn test_filters_on_degenerate_tree() {
        let doc = Document::parse_str("<book/>").unwrap();
        let filter = Filter::new("title", |_| true);
        assert!(doc.find_all_with_filter("book", &filter).unwrap().is_empty());
        assert_eq!(values(&doc.find_all("book").unwrap()), vec!["book", "/"]);
    }
}
