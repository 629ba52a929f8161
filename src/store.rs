//! In-process document registry.
//!
//! Documents live for the lifetime of the process. Writers to the same id race and the last write
//! wins; the lock only protects the map itself, not read-modify-write sequences across calls.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A stored contract and its most recent summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Normalized text extracted from the upload.
    pub text: String,
    /// Summary bullets, set by the summarization step.
    pub summary: Option<Vec<String>>,
}

/// Shared registry of uploaded documents keyed by identifier.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<String, DocumentRecord>>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document. Any previous summary for the id is discarded.
    pub fn put(&self, id: &str, text: String) {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        documents.insert(id.to_string(), DocumentRecord { text, summary: None });
    }

    /// Return the text of a document, if present.
    pub fn get_text(&self, id: &str) -> Option<String> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        documents.get(id).map(|record| record.text.clone())
    }

    /// Attach summary bullets to a document, creating an empty-text record when the id is unknown.
    pub fn put_summary(&self, id: &str, bullets: Vec<String>) {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        documents.entry(id.to_string()).or_default().summary = Some(bullets);
    }

    /// Return the summary bullets of a document, if a summary has been stored.
    pub fn get_summary(&self, id: &str) -> Option<Vec<String>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        documents.get(id).and_then(|record| record.summary.clone())
    }

    /// Number of documents currently held.
    pub(crate) fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
