//! Cosine similarity ranking over processed documents.
//!
//! Ranking is a pure computation: the pipeline embeds the query first, then
//! calls [`rank_chunks`] against an externally supplied document collection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{ProcessedDocument, SearchResult};
use crate::error::{RagError, Result};

/// Options controlling a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of results to return. Must be greater than zero.
    pub top_k: usize,
    /// Inclusive lower bound on similarity for a result to be retained.
    /// Must lie in [0, 1].
    pub min_similarity: f32,
    /// If set, only documents whose category is listed are searched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top_k: 5, min_similarity: 0.3, categories: None }
    }
}

impl SearchOptions {
    /// Validate the options, failing fast on contract violations.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `top_k == 0` or `min_similarity`
    /// lies outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(RagError::ConfigError(format!(
                "min_similarity ({}) must lie in [0, 1]",
                self.min_similarity
            )));
        }
        Ok(())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Defined as 0.0 when either vector has zero magnitude or the lengths
/// differ, rather than faulting on malformed input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Rank every chunk of every document against a query embedding.
///
/// Documents outside `options.categories` (when set) are skipped. Chunks
/// scoring below `options.min_similarity` are dropped; the rest are sorted
/// by descending similarity — ties keep document-then-chunk order, so
/// results are deterministic — and truncated to `options.top_k`.
///
/// An empty result is a valid outcome meaning nothing relevant was found.
/// Call [`SearchOptions::validate`] before ranking; this function assumes
/// valid options.
pub fn rank_chunks(
    query_embedding: &[f32],
    documents: &[ProcessedDocument],
    options: &SearchOptions,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = Vec::new();

    for document in documents {
        if let Some(categories) = &options.categories {
            if !categories.contains(&document.category) {
                continue;
            }
        }
        let summary = document.summary();
        for chunk in &document.chunks {
            let score = cosine_similarity(query_embedding, &chunk.embedding);
            if score >= options.min_similarity {
                results.push(SearchResult {
                    chunk: chunk.clone(),
                    score,
                    document: summary.clone(),
                });
            }
        }
    }

    // Stable sort: equal scores keep document-then-chunk insertion order.
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(options.top_k);

    debug!(result_count = results.len(), top_k = options.top_k, "ranked chunks");
    results
}
