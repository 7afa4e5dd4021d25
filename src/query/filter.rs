//! Structural Filters
//!
//! A filter requires some descendant of a candidate to carry the value `field`
//! and have a first child whose value passes the predicate, e.g. "a `book` with a `title`
//! reading `Dune`".

use std::fmt;

use crate::dom::NodeRef;

/// Predicate over a node value
pub type Predicate = dyn Fn(&str) -> bool + Send + Sync;

/// A (field, predicate) pair
pub struct Filter {
    field: String,
    predicate: Box<Predicate>,
}

impl Filter {
    pub fn new<F>(field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Filter {
            field: field.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Filter whose predicate is equality with `expected`
    pub fn equals(field: impl Into<String>, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self::new(field, move |value| value == expected)
    }

    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[inline]
    pub fn test(&self, value: &str) -> bool {
        (self.predicate)(value)
    }

    /// True if some strict descendant of `node` has the value `field` and a
    /// first child passing the predicate. A childless descendant never does.
    pub fn is_satisfied_by(&self, node: NodeRef<'_>) -> bool {
        node.descendants().any(|candidate| {
            candidate.value() == self.field
                && candidate
                    .first_child()
                    .is_some_and(|child| self.test(child.value()))
        })
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// All filters must hold; stops at the first one that does not
pub fn satisfies_all(node: NodeRef<'_>, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| filter.is_satisfied_by(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_descendant_first_child() {
        let doc = Document::parse_str(
            "<book><meta><title>Dune</title></meta></book>",
        )
        .unwrap();
        let book = doc.root().first_child().unwrap();

        assert!(Filter::equals("title", "Dune").is_satisfied_by(book));
        assert!(!Filter::equals("title", "Foo").is_satisfied_by(book));
        assert!(Filter::new("title", |v| v.starts_with("Du")).is_satisfied_by(book));
    }

    #[test]
    fn test_node_itself_is_excluded() {
        let doc = Document::parse_str("<title>Dune</title>").unwrap();
        let title = doc.root().first_child().unwrap();
        assert!(!Filter::equals("title", "Dune").is_satisfied_by(title));
    }

    #[test]
    fn test_only_first_child_is_tested() {
        let doc = Document::parse_str("<book><title><b>x</b>Dune</title></book>").unwrap();
        let book = doc.root().first_child().unwrap();
        assert!(!Filter::equals("title", "Dune").is_satisfied_by(book));
        assert!(Filter::equals("title", "b").is_satisfied_by(book));
    }

    #[test]
    fn test_empty_field_tag_sees_close_marker() {
        let doc = Document::parse_str("<book><title></title></book>").unwrap();
        let book = doc.root().first_child().unwrap();
        assert!(Filter::equals("title", "/title").is_satisfied_by(book));
        assert!(!Filter::new("title", |v| v.is_empty()).is_satisfied_by(book));
    }

    #[test]
    fn test_childless_tree_never_satisfies() {
        let doc = Document::parse_str("").unwrap();
        assert!(!Filter::new("anything", |_| true).is_satisfied_by(doc.root()));
    }

    #[test]
    fn test_all_short_circuits() {
        let doc = Document::parse_str("<book><title>Dune</title></book>").unwrap();
        let book = doc.root().first_child().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let filters = [
            Filter::equals("title", "Foo"),
            Filter::new("title", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ];

        assert!(!satisfies_all(book, &filters));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(satisfies_all(book, &[]));
    }
}
