//! ResourceArc Wrappers
//!
//! Parsed documents handed to the BEAM. A document is immutable once built,
//! so queries from several processes read it concurrently without a lock.

use crate::dom::Document;
use rustler::ResourceArc;

/// Wrapper for Document that can be stored in a ResourceArc
pub struct DocumentResource {
    pub doc: Document,
}

impl DocumentResource {
    pub fn new(doc: Document) -> Self {
        DocumentResource { doc }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
