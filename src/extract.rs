//! Text extraction from raw file bytes.
//!
//! Extraction dispatches through an [`ExtractorRegistry`] of pluggable
//! [`FormatExtractor`]s keyed by content type. This is a soft-failure
//! boundary: when no extractor is registered for a rich format, or a
//! registered extractor fails internally, the registry returns descriptive
//! placeholder text naming the file instead of an error, so chunking and
//! embedding can proceed on whatever text exists.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// A format-specific text extractor.
///
/// Implementations convert raw bytes of one or more content types into
/// plain text. Internal failures are returned as errors; the
/// [`ExtractorRegistry`] converts them into placeholder text.
#[async_trait]
pub trait FormatExtractor: Send + Sync {
    /// The content types this extractor handles.
    fn supported_types(&self) -> &[&str];

    /// Extract plain text from raw bytes.
    async fn extract(&self, data: &[u8]) -> Result<String>;
}

/// Extractor for plain-text-like formats: decodes bytes as UTF-8 (lossily)
/// with no further transformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl FormatExtractor for PlainTextExtractor {
    fn supported_types(&self) -> &[&str] {
        &["text/plain", "text/csv", "text/markdown", "application/json"]
    }

    async fn extract(&self, data: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

/// Content types that need a format-specific extractor and cannot fall back
/// to raw text decoding.
const RICH_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Registry of [`FormatExtractor`]s keyed by content type.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::extract::{ExtractorRegistry, PlainTextExtractor};
///
/// let mut registry = ExtractorRegistry::new();
/// registry.register(PlainTextExtractor);
/// let text = registry.extract(b"hello", "text/plain", "note.txt").await;
/// ```
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn FormatExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { extractors: HashMap::new() }
    }

    /// Create a registry with the default plain-text extractor registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PlainTextExtractor);
        registry
    }

    /// Register an extractor for every content type it supports.
    ///
    /// Later registrations override earlier ones for overlapping types.
    pub fn register<E: FormatExtractor + 'static>(&mut self, extractor: E) {
        let extractor = Arc::new(extractor);
        for content_type in extractor.supported_types() {
            self.extractors.insert((*content_type).to_string(), extractor.clone());
        }
    }

    /// Get the extractor registered for a content type.
    pub fn get(&self, content_type: &str) -> Option<Arc<dyn FormatExtractor>> {
        self.extractors.get(content_type).cloned()
    }

    /// Extract plain text from raw bytes, dispatching on the declared
    /// content type.
    ///
    /// Never fails: rich formats without a registered extractor, and
    /// extractors that error internally, yield placeholder text naming the
    /// file; unknown types fall back to raw text decoding.
    pub async fn extract(&self, data: &[u8], declared_type: &str, file_name: &str) -> String {
        if let Some(extractor) = self.get(declared_type) {
            match extractor.extract(data).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(file_name, declared_type, error = %e, "extractor failed, using placeholder");
                    format!("[Text extraction failed for {file_name} ({declared_type}): {e}]")
                }
            }
        } else if RICH_TYPES.contains(&declared_type) {
            warn!(file_name, declared_type, "no extractor registered for rich format");
            format!(
                "[Text extraction is not supported for {file_name}: no extractor registered for {declared_type}]"
            )
        } else {
            // Unknown type: best effort raw decoding.
            String::from_utf8_lossy(data).into_owned()
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagError;

    struct FailingExtractor;

    #[async_trait]
    impl FormatExtractor for FailingExtractor {
        fn supported_types(&self) -> &[&str] {
            &["application/pdf"]
        }

        async fn extract(&self, _data: &[u8]) -> Result<String> {
            Err(RagError::ExtractionError {
                file_name: "report.pdf".to_string(),
                message: "corrupt xref table".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn plain_text_decodes_directly() {
        let registry = ExtractorRegistry::with_defaults();
        let text = registry.extract(b"hello world", "text/plain", "note.txt").await;
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn csv_decodes_directly() {
        let registry = ExtractorRegistry::with_defaults();
        let text = registry.extract(b"a,b,c\n1,2,3", "text/csv", "data.csv").await;
        assert_eq!(text, "a,b,c\n1,2,3");
    }

    #[tokio::test]
    async fn unregistered_rich_format_yields_placeholder_naming_the_file() {
        let registry = ExtractorRegistry::with_defaults();
        let text = registry.extract(&[0x25, 0x50, 0x44, 0x46], "application/pdf", "report.pdf").await;
        assert!(text.contains("report.pdf"));
        assert!(text.contains("application/pdf"));
    }

    #[tokio::test]
    async fn failing_extractor_yields_placeholder_not_error() {
        let mut registry = ExtractorRegistry::new();
        registry.register(FailingExtractor);
        let text = registry.extract(b"%PDF-1.7", "application/pdf", "report.pdf").await;
        assert!(text.contains("report.pdf"));
        assert!(text.contains("corrupt xref table"));
    }

    #[tokio::test]
    async fn unknown_type_falls_back_to_raw_decoding() {
        let registry = ExtractorRegistry::with_defaults();
        let text = registry.extract(b"binary-ish text", "application/x-custom", "blob.bin").await;
        assert_eq!(text, "binary-ish text");
    }

    #[tokio::test]
    async fn invalid_utf8_is_decoded_lossily() {
        let registry = ExtractorRegistry::with_defaults();
        let text = registry.extract(&[b'h', b'i', 0xFF], "text/plain", "note.txt").await;
        assert!(text.starts_with("hi"));
    }
}
