//! # docrag
//!
//! Document ingestion and semantic retrieval for AI agents: extraction,
//! chunking, embedding, cosine-similarity search, and bounded context
//! assembly.
//!
//! ## Architecture
//!
//! Ingestion runs a sequential pipeline per document:
//!
//! ```text
//! bytes → ExtractorRegistry → Chunker → Embedder → ProcessedDocument
//! ```
//!
//! Queries run against an externally supplied document collection:
//!
//! ```text
//! query → Embedder → rank_chunks → ContextAssembler → context blob
//! ```
//!
//! The [`RagPipeline`] orchestrates both flows over an injected
//! [`EmbeddingProvider`]. Extraction is a soft-failure boundary (faults
//! become placeholder text); embedding faults become per-batch fallback
//! vectors counted on the document, so ingestion never aborts.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docrag::{DocumentUpload, PipelineConfig, RagPipeline, SearchOptions};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(PipelineConfig::default())
//!     .embedding_provider(Arc::new(provider))
//!     .build()?;
//!
//! let document = pipeline
//!     .ingest(DocumentUpload {
//!         file_name: "q3.txt".into(),
//!         content_type: "text/plain".into(),
//!         data: report_bytes,
//!         category: "reports".into(),
//!         description: None,
//!         session_id: None,
//!     })
//!     .await;
//!
//! let context = pipeline
//!     .query_context("revenue growth", &[document], &SearchOptions::default(), 4000)
//!     .await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `openai` — enables [`openai::OpenAiEmbeddingProvider`], a
//!   `reqwest`-backed provider for the OpenAI embeddings API.

pub mod chunking;
pub mod config;
pub mod context;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod ratelimit;
pub mod search;
pub mod store;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{Chunker, KeywordSectionClassifier, SectionClassifier, WordChunker};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use context::ContextAssembler;
pub use document::{
    ChunkMetadata, DocumentChunk, DocumentSummary, DocumentUpload, ProcessedDocument, SearchResult,
};
pub use embedding::{Embedder, EmbeddingOutput, EmbeddingProvider};
pub use error::{RagError, Result};
pub use extract::{ExtractorRegistry, FormatExtractor, PlainTextExtractor};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use ratelimit::TokenBucket;
pub use search::{SearchOptions, cosine_similarity, rank_chunks};
pub use store::InMemoryDocumentStore;
