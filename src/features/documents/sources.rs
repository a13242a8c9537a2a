use std::sync::RwLock;

use crate::core::error::Result;
use crate::features::documents::models::Document;

/// Supplies the documents offered for attachment in feedback and support reports
pub trait DocumentSource: Send + Sync {
    fn documents(&self) -> Result<Vec<Document>>;
}

/// Fixed in-memory document set, e.g. the host's recently opened files
#[derive(Debug, Default)]
pub struct StaticDocumentSource {
    docs: RwLock<Vec<Document>>,
}

impl StaticDocumentSource {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    /// Replace the offered documents
    pub fn set_documents(&self, docs: Vec<Document>) {
        let mut guard = self.docs.write().unwrap_or_else(|e| e.into_inner());
        *guard = docs;
    }
}

impl DocumentSource for StaticDocumentSource {
    fn documents(&self) -> Result<Vec<Document>> {
        let guard = self.docs.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }
}
