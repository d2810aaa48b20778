//! Immutable snapshot of indexed documents for one build cycle.
//!
//! The store is created from the engine's full document list, then the
//! playlist resolver may append transient documents (synthesized for absolute
//! URL entries) before the tree is published. Indices beyond the persistent
//! length address the transient overflow area.

use crate::document::Document;

/// Document collection for one rebuild cycle.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    transient: Vec<Document>,
}

impl DocumentStore {
    /// Build a store from the engine's document list, in engine iteration
    /// order.
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs,
            transient: Vec::new(),
        }
    }

    /// Number of persistent (engine-produced) documents.
    pub fn persistent_len(&self) -> usize {
        self.docs.len()
    }

    /// Total number of documents, transient included.
    pub fn len(&self) -> usize {
        self.docs.len() + self.transient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a document by index. Indices at or beyond the persistent
    /// length address transient documents.
    pub fn get(&self, idx: usize) -> Option<&Document> {
        if idx < self.docs.len() {
            self.docs.get(idx)
        } else {
            self.transient.get(idx - self.docs.len())
        }
    }

    /// Whether the index addresses a persistent document.
    pub fn is_persistent(&self, idx: usize) -> bool {
        idx < self.docs.len()
    }

    /// Append a transient document and return its index.
    pub fn push_transient(&mut self, doc: Document) -> usize {
        self.transient.push(doc);
        self.docs.len() + self.transient.len() - 1
    }

    /// Iterate over persistent documents with their indices.
    pub fn iter_persistent(&self) -> impl Iterator<Item = (usize, &Document)> {
        self.docs.iter().enumerate()
    }
}
