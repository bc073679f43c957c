//! In-memory document collection.
//!
//! Durable storage is a collaborator's responsibility; this store is the
//! "externally supplied collection of already-processed documents" made
//! concrete for tests and small deployments. Insertion order is preserved
//! so tie-breaking during ranking stays deterministic.

use tokio::sync::RwLock;

use crate::document::ProcessedDocument;

/// An insertion-ordered, async-safe collection of [`ProcessedDocument`]s.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::store::InMemoryDocumentStore;
///
/// let store = InMemoryDocumentStore::new();
/// store.insert(document).await;
/// let snapshot = store.all().await;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<ProcessedDocument>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any existing document with the same ID.
    pub async fn insert(&self, document: ProcessedDocument) {
        let mut documents = self.documents.write().await;
        if let Some(existing) = documents.iter_mut().find(|d| d.id == document.id) {
            *existing = document;
        } else {
            documents.push(document);
        }
    }

    /// Get a document by ID.
    pub async fn get(&self, id: &str) -> Option<ProcessedDocument> {
        self.documents.read().await.iter().find(|d| d.id == id).cloned()
    }

    /// Remove a document by ID, returning it if present.
    pub async fn remove(&self, id: &str) -> Option<ProcessedDocument> {
        let mut documents = self.documents.write().await;
        let position = documents.iter().position(|d| d.id == id)?;
        Some(documents.remove(position))
    }

    /// A snapshot of all documents in insertion order.
    pub async fn all(&self) -> Vec<ProcessedDocument> {
        self.documents.read().await.clone()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Remove all documents.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}
