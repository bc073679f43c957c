//! Data types for documents, chunks, and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw file handed to the pipeline by an upload layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    /// Original file name, used in placeholders and context blocks.
    pub file_name: String,
    /// Declared content type (e.g. `text/plain`, `application/pdf`).
    pub content_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
    /// Free-form category label (used for search filtering).
    pub category: String,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque reference to an owning session, carried but never interpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// A fully ingested document: extracted text plus embedded chunks.
///
/// Created once per successful extraction + chunking + embedding pass and
/// immutable afterwards. `fallback_chunks > 0` means some embeddings were
/// substituted with fallback vectors and retrieval quality is degraded for
/// this document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Unique identifier for the document.
    pub id: String,
    /// Original file name.
    pub file_name: String,
    /// Declared content type of the uploaded file.
    pub file_type: String,
    /// Size of the uploaded file in bytes.
    pub file_size: usize,
    /// Free-form category label.
    pub category: String,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque owning-session reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Full extracted text (or a placeholder if extraction failed).
    pub extracted_text: String,
    /// Ordered chunks with embeddings attached. Chunk indexes are contiguous
    /// ascending from zero.
    pub chunks: Vec<DocumentChunk>,
    /// Number of chunks whose embeddings came from the fallback policy.
    pub fallback_chunks: usize,
    /// When the upload was received.
    pub uploaded_at: DateTime<Utc>,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}

impl ProcessedDocument {
    /// A lightweight summary of this document for attaching to search results.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            document_id: self.id.clone(),
            file_name: self.file_name.clone(),
            category: self.category.clone(),
        }
    }
}

/// One overlapping text window of a [`ProcessedDocument`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    /// Unique identifier for the chunk (`{document_id}_{chunk_index}`).
    pub id: String,
    /// The ID of the parent document.
    pub document_id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Zero-based position of this chunk within the document.
    pub chunk_index: usize,
    /// Word-token offset of the chunk's first word in the parent text.
    pub start_offset: usize,
    /// Word-token offset one past the chunk's last word.
    pub end_offset: usize,
    /// The embedding vector for this chunk's text (empty until embedded).
    pub embedding: Vec<f32>,
    /// Chunk-level metadata.
    pub metadata: ChunkMetadata,
}

/// Heuristic metadata attached to each chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Number of words in the chunk.
    pub word_count: usize,
    /// Section label detected by the configured classifier.
    pub section: String,
}

/// A lightweight reference to the document that owns a search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// The owning document's ID.
    pub document_id: String,
    /// The owning document's file name.
    pub file_name: String,
    /// The owning document's category.
    pub category: String,
}

/// A retrieved chunk paired with its similarity score.
///
/// Ephemeral: created per query and discarded after the caller consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: DocumentChunk,
    /// Cosine similarity between the query and the chunk, in [-1, 1].
    pub score: f32,
    /// Summary of the owning document.
    pub document: DocumentSummary,
}
