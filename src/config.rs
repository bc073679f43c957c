//! Configuration for the ingestion pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for document ingestion.
///
/// Chunk sizes are measured in whitespace-delimited words, not characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Maximum chunk size in words.
    pub chunk_size: usize,
    /// Number of overlapping words between consecutive chunks.
    pub chunk_overlap: usize,
    /// Hard cap on the number of chunks per document, bounding embedding cost.
    pub max_chunks: usize,
    /// Number of texts sent to the embedding provider per request.
    pub embedding_batch_size: usize,
    /// Minimum spacing between consecutive embedding batches, in milliseconds.
    pub batch_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            max_chunks: 100,
            embedding_batch_size: 10,
            batch_delay_ms: 200,
        }
    }
}

impl PipelineConfig {
    /// Create a new builder for constructing a [`PipelineConfig`].
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the maximum chunk size in words.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in words.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the maximum number of chunks emitted per document.
    pub fn max_chunks(mut self, max: usize) -> Self {
        self.config.max_chunks = max;
        self
    }

    /// Set the number of texts per embedding provider request.
    pub fn embedding_batch_size(mut self, size: usize) -> Self {
        self.config.embedding_batch_size = size;
        self
    }

    /// Set the minimum spacing between embedding batches, in milliseconds.
    pub fn batch_delay_ms(mut self, delay: u64) -> Self {
        self.config.batch_delay_ms = delay;
        self
    }

    /// Build the [`PipelineConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size` (the chunking window would never advance)
    /// - `max_chunks == 0`
    /// - `embedding_batch_size == 0`
    pub fn build(self) -> Result<PipelineConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.max_chunks == 0 {
            return Err(RagError::ConfigError("max_chunks must be greater than zero".to_string()));
        }
        if self.config.embedding_batch_size == 0 {
            return Err(RagError::ConfigError(
                "embedding_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
