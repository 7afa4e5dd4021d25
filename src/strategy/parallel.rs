//! Parallel Tag Queries
//!
//! Uses Rayon to evaluate several independent queries against one document.
//! The document is immutable once built, so workers share it by reference.
//! Results come back in the order the queries were given.

use rayon::prelude::*;

use crate::core::error::QueryError;
use crate::dom::{Document, NodeRef};
use crate::query::{find_all, Filter};

/// Evaluate multiple unfiltered queries in parallel
pub fn find_all_parallel<'a>(
    doc: &'a Document,
    targets: &[&str],
) -> Vec<Result<Vec<NodeRef<'a>>, QueryError>> {
    targets
        .par_iter()
        .map(|target| find_all(doc, target, &[]))
        .collect()
}

/// Evaluate multiple (target, filters) queries in parallel
pub fn find_all_parallel_with_filters<'a>(
    doc: &'a Document,
    queries: &[(&str, &[Filter])],
) -> Vec<Result<Vec<NodeRef<'a>>, QueryError>> {
    queries
        .par_iter()
        .map(|(target, filters)| find_all(doc, target, filters))
        .collect()
}
