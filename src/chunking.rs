//! Document chunking: overlapping word windows with section detection.
//!
//! The [`Chunker`] trait is the seam between the pipeline and the windowing
//! strategy; [`WordChunker`] is the default implementation. Section labels
//! come from a pluggable [`SectionClassifier`] so smarter labeling can be
//! substituted without touching the windowing logic.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::document::{ChunkMetadata, DocumentChunk};

/// A strategy for splitting extracted text into chunks.
///
/// Implementations produce [`DocumentChunk`]s with text, offsets, and
/// metadata but empty embeddings. Embeddings are attached later by the
/// pipeline. Chunking is pure and deterministic: the same text and
/// configuration always produce identical chunks.
pub trait Chunker: Send + Sync {
    /// Split text into chunks owned by `document_id`.
    ///
    /// Returns an empty `Vec` if the text contains no words.
    fn chunk(&self, text: &str, document_id: &str) -> Vec<DocumentChunk>;
}

/// Classifies a chunk of text into a section label.
pub trait SectionClassifier: Send + Sync {
    /// Return a section label for the given chunk text.
    fn classify(&self, text: &str) -> String;
}

/// Keyword-based section detection.
///
/// Matches a fixed list of keywords against the lowercased chunk text, in
/// priority order; text matching none of them gets the generic `content`
/// label.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSectionClassifier;

/// Keyword lists checked in order; first hit wins.
const SECTION_KEYWORDS: &[(&str, &[&str])] = &[
    ("executive_summary", &["executive summary"]),
    ("introduction", &["introduction"]),
    ("conclusion", &["conclusion"]),
    ("financial", &["financial", "revenue", "budget"]),
    ("strategy", &["strategy", "strategic"]),
];

impl SectionClassifier for KeywordSectionClassifier {
    fn classify(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        for (label, keywords) in SECTION_KEYWORDS {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return (*label).to_string();
            }
        }
        "content".to_string()
    }
}

/// Splits text into overlapping windows of whitespace-delimited words.
///
/// Windows are `chunk_size` words long and start offsets advance by
/// `chunk_size - chunk_overlap`; at most `max_chunks` windows are emitted
/// per document. Texts shorter than `chunk_size` produce exactly one chunk
/// covering all words. The configuration is validated at build time, so
/// `chunk_overlap < chunk_size` always holds here.
pub struct WordChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    max_chunks: usize,
    classifier: Arc<dyn SectionClassifier>,
}

impl WordChunker {
    /// Create a chunker from a validated configuration, with the default
    /// keyword classifier.
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_classifier(config, Arc::new(KeywordSectionClassifier))
    }

    /// Create a chunker with a custom section classifier.
    pub fn with_classifier(config: &PipelineConfig, classifier: Arc<dyn SectionClassifier>) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            max_chunks: config.max_chunks,
            classifier,
        }
    }
}

impl Chunker for WordChunker {
    fn chunk(&self, text: &str, document_id: &str) -> Vec<DocumentChunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        // Validated at config build time: overlap < chunk_size, so step >= 1.
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < words.len() && chunks.len() < self.max_chunks {
            let end = (start + self.chunk_size).min(words.len());
            let chunk_words = &words[start..end];
            let chunk_text = chunk_words.join(" ");
            let section = self.classifier.classify(&chunk_text);
            let chunk_index = chunks.len();

            chunks.push(DocumentChunk {
                id: format!("{document_id}_{chunk_index}"),
                document_id: document_id.to_string(),
                text: chunk_text,
                chunk_index,
                start_offset: start,
                end_offset: end,
                embedding: Vec::new(),
                metadata: ChunkMetadata { word_count: chunk_words.len(), section },
            });

            if end >= words.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize, max_chunks: usize) -> WordChunker {
        let config = PipelineConfig::builder()
            .chunk_size(chunk_size)
            .chunk_overlap(overlap)
            .max_chunks(max_chunks)
            .build()
            .unwrap();
        WordChunker::new(&config)
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn hundred_words_chunk_40_overlap_10_gives_four_chunks() {
        let chunks = chunker(40, 10, 100).chunk(&words(100), "doc");
        assert_eq!(chunks.len(), 4);
        let starts: Vec<usize> = chunks.iter().map(|c| c.start_offset).collect();
        assert_eq!(starts, vec![0, 30, 60, 90]);
        assert_eq!(chunks[3].end_offset, 100);
        assert_eq!(chunks[3].metadata.word_count, 10);
    }

    #[test]
    fn short_text_gives_exactly_one_chunk_covering_all_words() {
        let chunks = chunker(40, 10, 100).chunk(&words(7), "doc");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].end_offset, 7);
        assert_eq!(chunks[0].metadata.word_count, 7);
    }

    #[test]
    fn empty_text_gives_no_chunks() {
        assert!(chunker(40, 10, 100).chunk("", "doc").is_empty());
        assert!(chunker(40, 10, 100).chunk("   \n\t ", "doc").is_empty());
    }

    #[test]
    fn max_chunks_caps_output() {
        let chunks = chunker(40, 10, 2).chunk(&words(1000), "doc");
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn chunk_indexes_are_contiguous_from_zero() {
        let chunks = chunker(40, 10, 100).chunk(&words(250), "doc");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
            assert_eq!(chunk.id, format!("doc_{i}"));
        }
    }

    #[test]
    fn consecutive_chunks_overlap_by_configured_amount() {
        let chunks = chunker(40, 10, 100).chunk(&words(100), "doc");
        for window in chunks.windows(2) {
            assert_eq!(window[1].start_offset, window[0].start_offset + 30);
        }
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = words(333);
        let a = chunker(40, 10, 100).chunk(&text, "doc");
        let b = chunker(40, 10, 100).chunk(&text, "doc");
        assert_eq!(a, b);
    }

    #[test]
    fn keyword_classifier_detects_sections() {
        let classifier = KeywordSectionClassifier;
        assert_eq!(classifier.classify("The Executive Summary follows"), "executive_summary");
        assert_eq!(classifier.classify("An introduction to the topic"), "introduction");
        assert_eq!(classifier.classify("In conclusion, we grew"), "conclusion");
        assert_eq!(classifier.classify("Revenue was up 20%"), "financial");
        assert_eq!(classifier.classify("our strategic goals"), "strategy");
        assert_eq!(classifier.classify("plain ordinary text"), "content");
    }

    #[test]
    fn section_labels_are_attached_to_chunks() {
        let chunks = chunker(10, 2, 100).chunk("quarterly revenue exceeded the annual budget", "doc");
        assert_eq!(chunks[0].metadata.section, "financial");
    }
}
