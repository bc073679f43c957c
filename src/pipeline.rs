//! Ingestion and retrieval pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the full workflow by composing an
//! [`ExtractorRegistry`], a [`Chunker`], an [`Embedder`] over an injected
//! [`EmbeddingProvider`], and a [`ContextAssembler`].
//!
//! # Example
//!
//! ```rust,ignore
//! use docrag::{RagPipeline, PipelineConfig};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(PipelineConfig::default())
//!     .embedding_provider(Arc::new(my_provider))
//!     .build()?;
//!
//! let document = pipeline.ingest(upload).await;
//! let results = pipeline.query("revenue growth", &[document], &options).await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::chunking::{Chunker, WordChunker};
use crate::config::PipelineConfig;
use crate::context::ContextAssembler;
use crate::document::{DocumentUpload, ProcessedDocument, SearchResult};
use crate::embedding::{Embedder, EmbeddingProvider};
use crate::error::{RagError, Result};
use crate::extract::ExtractorRegistry;
use crate::search::{SearchOptions, rank_chunks};

/// The ingestion and retrieval pipeline.
///
/// Ingestion runs extract → chunk → embed and produces a
/// [`ProcessedDocument`]; queries run embed → rank → (optionally) assemble
/// against an externally supplied document collection. Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: PipelineConfig,
    extractors: ExtractorRegistry,
    chunker: Arc<dyn Chunker>,
    embedder: Embedder,
    assembler: ContextAssembler,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether embedding currently degrades to fallback vectors because the
    /// provider is unavailable. Callers should surface this so users can be
    /// warned that retrieval quality is degraded.
    pub fn is_degraded(&self) -> bool {
        self.embedder.is_degraded()
    }

    /// Ingest one upload: extract → chunk → embed.
    ///
    /// This operation never fails. Extraction faults become placeholder
    /// text, and embedding faults become fallback vectors counted in
    /// [`ProcessedDocument::fallback_chunks`].
    pub async fn ingest(&self, upload: DocumentUpload) -> ProcessedDocument {
        let uploaded_at = Utc::now();
        let document_id = Uuid::new_v4().to_string();

        let extracted_text =
            self.extractors.extract(&upload.data, &upload.content_type, &upload.file_name).await;

        let mut chunks = self.chunker.chunk(&extracted_text, &document_id);
        let fallback_chunks = if chunks.is_empty() {
            0
        } else {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let output = self.embedder.embed_documents(&texts).await;
            for (chunk, embedding) in chunks.iter_mut().zip(output.vectors) {
                chunk.embedding = embedding;
            }
            output.fallback_count
        };

        info!(
            document.id = %document_id,
            file_name = %upload.file_name,
            chunk_count = chunks.len(),
            fallback_chunks,
            "ingested document"
        );

        ProcessedDocument {
            id: document_id,
            file_name: upload.file_name,
            file_type: upload.content_type,
            file_size: upload.data.len(),
            category: upload.category,
            description: upload.description,
            session_id: upload.session_id,
            extracted_text,
            chunks,
            fallback_chunks,
            uploaded_at,
            processed_at: Utc::now(),
        }
    }

    /// Ingest multiple uploads sequentially.
    pub async fn ingest_batch(&self, uploads: Vec<DocumentUpload>) -> Vec<ProcessedDocument> {
        let mut documents = Vec::with_capacity(uploads.len());
        for upload in uploads {
            documents.push(self.ingest(upload).await);
        }
        documents
    }

    /// Query a document collection: embed → rank.
    ///
    /// Returns results ordered by descending similarity, at most
    /// `options.top_k` of them, all scoring at least `options.min_similarity`.
    /// An empty result means nothing relevant was found.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] for invalid options and
    /// [`RagError::PipelineError`] if query embedding fails (notably when
    /// the provider is unavailable).
    pub async fn query(
        &self,
        query: &str,
        documents: &[ProcessedDocument],
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        options.validate()?;

        let query_embedding = self.embedder.embed_query(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let results = rank_chunks(&query_embedding, documents, options);
        info!(result_count = results.len(), "query completed");
        Ok(results)
    }

    /// Query a document collection and assemble the ranked results into a
    /// context blob of at most `max_length` bytes.
    ///
    /// # Errors
    ///
    /// Same as [`query`](RagPipeline::query).
    pub async fn query_context(
        &self,
        query: &str,
        documents: &[ProcessedDocument],
        options: &SearchOptions,
        max_length: usize,
    ) -> Result<String> {
        let results = self.query(query, documents, options).await?;
        Ok(self.assembler.assemble(&results, max_length))
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// Only the embedding provider is required; the configuration, extractor
/// registry, chunker, and assembler all have defaults.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<PipelineConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    extractors: Option<ExtractorRegistry>,
    chunker: Option<Arc<dyn Chunker>>,
    assembler: Option<ContextAssembler>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration (defaults to [`PipelineConfig::default`]).
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider. Required.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the extractor registry (defaults to [`ExtractorRegistry::with_defaults`]).
    pub fn extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = Some(extractors);
        self
    }

    /// Set the chunker (defaults to a [`WordChunker`] built from the config).
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the context assembler (defaults to [`ContextAssembler::default`]).
    pub fn assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = Some(assembler);
        self
    }

    /// Build the [`RagPipeline`], validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the embedding provider is
    /// missing or the configuration is inconsistent (e.g. overlap ≥ chunk
    /// size).
    pub fn build(self) -> Result<RagPipeline> {
        // Re-validate through the config builder: the config may have been
        // constructed directly rather than through PipelineConfig::builder().
        let config = self.config.unwrap_or_default();
        let config = PipelineConfig::builder()
            .chunk_size(config.chunk_size)
            .chunk_overlap(config.chunk_overlap)
            .max_chunks(config.max_chunks)
            .embedding_batch_size(config.embedding_batch_size)
            .batch_delay_ms(config.batch_delay_ms)
            .build()?;
        let provider = self.embedding_provider.ok_or_else(|| {
            RagError::ConfigError("embedding_provider is required".to_string())
        })?;

        let chunker = self.chunker.unwrap_or_else(|| Arc::new(WordChunker::new(&config)));
        let embedder = Embedder::new(provider, &config);

        Ok(RagPipeline {
            config,
            extractors: self.extractors.unwrap_or_default(),
            chunker,
            embedder,
            assembler: self.assembler.unwrap_or_default(),
        })
    }
}
