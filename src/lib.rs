//! xmlquery - markup parsing into a queryable tree
//!
//! Pipeline:
//! - Tokenizer: expectation-driven state machine (core::tokenizer)
//! - TreeBuilder: token stream to arena tree with parent links (dom)
//! - Query: prefix-with-boundary tag search with structural filters (query)
//! - Parallel: independent queries over rayon (strategy)
//!
//! The crate is usable as a Rust library and as the `Elixir.XmlQuery.Native`
//! NIF library.

use std::path::Path;

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod dom;
pub mod query;
pub mod strategy;
mod resource;
mod term;

pub use crate::core::attributes::{Attribute, AttributeSet};
pub use crate::core::error::{ParseError, ParseWarning, Position, QueryError};
pub use crate::core::options::ParseOptions;
pub use crate::core::tokenizer::{tokenize, tokenize_with, Token, TokenKind, TokenStream};
pub use crate::dom::{Document, NodeId, NodeRef};
pub use crate::query::Filter;

use resource::{DocumentRef, DocumentResource};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Rust API
// ============================================================================

/// Read and parse the document at `path` (lenient mode)
pub fn parse(path: impl AsRef<Path>) -> Result<Document, ParseError> {
    parse_with(path, ParseOptions::new())
}

/// Read and parse the document at `path`.
///
/// The file is read into memory and closed before tokenization starts.
pub fn parse_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Document, ParseError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(target: "xmlquery", "read {} bytes from {}", input.len(), path.display());
    Document::parse_str_with(&input, options)
}

// ============================================================================
// NIF: Parsing
// ============================================================================

fn document_result<'a>(env: Env<'a>, result: Result<Document, ParseError>) -> Term<'a> {
    match result {
        Ok(doc) => {
            let warnings = term::warnings_to_term(env, doc.warnings());
            let arc = ResourceArc::new(DocumentResource::new(doc));
            (term::ok(), arc, warnings).encode(env)
        }
        Err(e) => term::error_to_term(env, &e),
    }
}

fn options(strict: bool) -> ParseOptions {
    ParseOptions::new().with_strict(strict)
}

/// Parse a file (returns {:ok, doc, warnings} or {:error, reason})
#[rustler::nif(schedule = "DirtyIo")]
fn parse_file<'a>(env: Env<'a>, path: String, strict: bool) -> NifResult<Term<'a>> {
    Ok(document_result(env, parse_with(path, options(strict))))
}

/// Parse a binary (returns {:ok, doc, warnings} or {:error, reason})
#[rustler::nif]
fn parse_string<'a>(env: Env<'a>, input: Binary<'a>, strict: bool) -> NifResult<Term<'a>> {
    let result = match std::str::from_utf8(input.as_slice()) {
        Ok(text) => Document::parse_str_with(text, options(strict)),
        Err(e) => return Ok(term::error_to_term(env, &e)),
    };
    Ok(document_result(env, result))
}

/// Tokenize a binary without building a tree
#[rustler::nif]
fn tokenize_string<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let text = match std::str::from_utf8(input.as_slice()) {
        Ok(text) => text,
        Err(e) => return Ok(term::error_to_term(env, &e)),
    };
    match tokenize(text) {
        Ok(stream) => Ok((term::ok(), term::tokens_to_term(env, &stream.tokens)).encode(env)),
        Err(e) => Ok(term::error_to_term(env, &e)),
    }
}

// ============================================================================
// NIF: Queries
// ============================================================================

/// Find matching tags; filters are `[{field, expected_value}]` equality checks
#[rustler::nif]
fn find_all<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    target: &str,
    filters: Vec<(String, String)>,
) -> NifResult<Term<'a>> {
    let filters: Vec<Filter> = filters
        .into_iter()
        .map(|(field, expected)| Filter::equals(field, expected))
        .collect();

    match doc_ref.doc.find_all_with_filters(target, &filters) {
        Ok(nodes) => Ok((term::ok(), term::nodes_to_term(env, &nodes)).encode(env)),
        Err(e) => Ok(term::error_to_term(env, &e)),
    }
}

/// Execute multiple queries in parallel
#[rustler::nif(schedule = "DirtyCpu")]
fn find_all_parallel<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    targets: Vec<&str>,
) -> NifResult<Term<'a>> {
    let results = strategy::find_all_parallel(&doc_ref.doc, &targets);

    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        let term = match result {
            Ok(nodes) => (term::ok(), term::nodes_to_term(env, &nodes)).encode(env),
            Err(e) => term::error_to_term(env, &e),
        };
        list = list.list_prepend(term);
    }
    Ok(list)
}

/// Render the tree as indented text
#[rustler::nif]
fn render(doc_ref: DocumentRef) -> String {
    doc_ref.doc.render()
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.XmlQuery.Native");

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "<?xml version=\"1.0\"?>\n<library>\n  <book id=\"1\">Dune</book>\n</library>\n"
        )
        .unwrap();

        let doc = parse(file.path()).unwrap();
        let books = doc.find_all("book").unwrap();
        assert_eq!(books.len(), 3);
        assert_eq!(books[1].value(), "Dune");
        assert_eq!(doc.root().first_child().unwrap().kind(), TokenKind::Meta);
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xml");
        match parse(&missing) {
            Err(ParseError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_strict() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<a><b></a></b>").unwrap();

        assert!(parse(file.path()).is_ok());
        assert!(matches!(
            parse_with(file.path(), ParseOptions::strict()),
            Err(ParseError::MismatchedCloseTag { .. })
        ));
    }

    #[test]
    fn test_parse_file_reports_warnings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<a></a></a>").unwrap();

        let doc = parse(file.path()).unwrap();
        assert_eq!(
            doc.warnings(),
            &[ParseWarning::UnbalancedTags { opened: 1, closed: 2 }]
        );
    }
}
