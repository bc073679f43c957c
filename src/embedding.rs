//! Embedding generation: provider trait, batching, pacing, and fallback.
//!
//! The [`EmbeddingProvider`] trait is the boundary to the external embedding
//! service; the [`Embedder`] wraps a provider with batch partitioning,
//! token-bucket pacing, dimension validation, and the per-batch fallback
//! policy. Document embedding never fails: a provider fault for one batch
//! substitutes deterministic fallback vectors for that batch only and is
//! reported through [`EmbeddingOutput::fallback_count`]. Query embedding
//! fails fast instead, so searches never silently rank against noise.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{RagError, Result};
use crate::ratelimit::TokenBucket;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends behind a unified async
/// interface. The response must be index-aligned with the request and every
/// vector must have exactly [`dimensions()`](EmbeddingProvider::dimensions)
/// entries; the [`Embedder`] rejects responses that disagree.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// A short name identifying the backend, used in errors and logs.
    fn name(&self) -> &str;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Whether the backend is reachable and credentialed.
    ///
    /// Providers constructed without credentials return `false`; every call
    /// through the [`Embedder`] then uses the fallback policy, observable
    /// via [`Embedder::is_degraded`].
    fn is_available(&self) -> bool {
        true
    }
}

/// The result of embedding a sequence of document texts.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingOutput {
    /// One vector per input text, index-aligned.
    pub vectors: Vec<Vec<f32>>,
    /// How many of the vectors came from the fallback policy.
    pub fallback_count: usize,
}

/// Batched, paced embedding over an injected [`EmbeddingProvider`].
///
/// # Example
///
/// ```rust,ignore
/// use docrag::embedding::Embedder;
///
/// let embedder = Embedder::new(provider, &config);
/// let output = embedder.embed_documents(&["first chunk", "second chunk"]).await;
/// assert_eq!(output.vectors.len(), 2);
/// ```
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    limiter: TokenBucket,
}

impl Embedder {
    /// Create an embedder over `provider`, taking batch size and pacing from
    /// the configuration.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            batch_size: config.embedding_batch_size,
            limiter: TokenBucket::new(1, Duration::from_millis(config.batch_delay_ms)),
        }
    }

    /// The dimensionality of every vector this embedder produces, fallback
    /// vectors included.
    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    /// Whether every call currently degrades to fallback vectors because the
    /// provider is unavailable.
    pub fn is_degraded(&self) -> bool {
        !self.provider.is_available()
    }

    /// Embed document texts in paced batches.
    ///
    /// Never fails: a provider fault (error, misaligned response, or wrong
    /// dimensionality) for one batch substitutes fallback vectors for that
    /// batch only, and processing continues with the next batch. The output
    /// is always index-aligned with the input and every vector has exactly
    /// [`dimensions()`](Embedder::dimensions) entries.
    pub async fn embed_documents(&self, texts: &[&str]) -> EmbeddingOutput {
        let mut vectors = Vec::with_capacity(texts.len());
        let mut fallback_count = 0;

        for batch in texts.chunks(self.batch_size) {
            self.limiter.acquire().await;
            match self.embed_batch_checked(batch).await {
                Ok(batch_vectors) => vectors.extend(batch_vectors),
                Err(e) => {
                    warn!(
                        provider = self.provider.name(),
                        batch_len = batch.len(),
                        error = %e,
                        "embedding batch failed, substituting fallback vectors"
                    );
                    fallback_count += batch.len();
                    vectors.extend(batch.iter().map(|t| fallback_vector(t, self.dimensions())));
                }
            }
        }

        EmbeddingOutput { vectors, fallback_count }
    }

    /// Embed a single query string.
    ///
    /// Unlike document embedding, this fails fast on provider unavailability
    /// or faults: ranking a search against a noise vector would return
    /// meaningless matches without any signal to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the provider is unavailable,
    /// the call fails, or the response has the wrong shape.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.limiter.acquire().await;
        let mut vectors = self.embed_batch_checked(&[text]).await?;
        vectors.pop().ok_or_else(|| RagError::EmbeddingError {
            provider: self.provider.name().to_string(),
            message: "provider returned an empty response".to_string(),
        })
    }

    /// Call the provider for one batch and validate the response shape.
    async fn embed_batch_checked(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>> {
        if !self.provider.is_available() {
            return Err(RagError::EmbeddingError {
                provider: self.provider.name().to_string(),
                message: "provider is unavailable".to_string(),
            });
        }

        debug!(provider = self.provider.name(), batch_len = batch.len(), "embedding batch");
        let vectors = self.provider.embed_batch(batch).await?;

        if vectors.len() != batch.len() {
            return Err(RagError::EmbeddingError {
                provider: self.provider.name().to_string(),
                message: format!(
                    "response has {} vectors for {} inputs",
                    vectors.len(),
                    batch.len()
                ),
            });
        }
        let expected = self.dimensions();
        if let Some(v) = vectors.iter().find(|v| v.len() != expected) {
            return Err(RagError::EmbeddingError {
                provider: self.provider.name().to_string(),
                message: format!("vector has dimension {} but provider declares {expected}", v.len()),
            });
        }

        Ok(vectors)
    }
}

/// Deterministic pseudo-noise vector used when a provider batch fails.
///
/// Seeded from the text content so repeated runs produce the same vector for
/// the same input. Values lie in [-1, 1].
pub fn fallback_vector(text: &str, dimensions: usize) -> Vec<f32> {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let mut state = hasher.finish();

    (0..dimensions)
        .map(|_| {
            // splitmix64
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            (z as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32
        })
        .collect()
}
