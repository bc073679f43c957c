//! Context assembly: ranked results into one bounded-length text blob.

use crate::document::SearchResult;

/// Separator between context blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Marker appended to a truncated final block.
const ELLIPSIS: &str = "...";

/// Assembles ranked search results into a single text blob for injection
/// into a downstream prompt.
///
/// Results are appended in rank order as tagged blocks until the length
/// budget is exhausted. The output never exceeds the requested maximum
/// length (measured in bytes; blocks are cut on character boundaries).
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    /// Minimum free budget required to emit a truncated final block.
    min_remainder: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self { min_remainder: 100 }
    }
}

impl ContextAssembler {
    /// Create an assembler that only truncates into a remainder larger than
    /// `min_remainder` bytes.
    pub fn new(min_remainder: usize) -> Self {
        Self { min_remainder }
    }

    /// Assemble results into a blob of at most `max_length` bytes.
    ///
    /// Each result becomes a `[Source: file]` block. A block that would
    /// overflow the budget is either truncated with an ellipsis marker (when
    /// more than `min_remainder` bytes are free) or dropped, and assembly
    /// stops there.
    pub fn assemble(&self, results: &[SearchResult], max_length: usize) -> String {
        let mut context = String::new();

        for result in results {
            let block = format!("[Source: {}]\n{}", result.document.file_name, result.chunk.text);
            let separator = if context.is_empty() { "" } else { BLOCK_SEPARATOR };

            if context.len() + separator.len() + block.len() <= max_length {
                context.push_str(separator);
                context.push_str(&block);
                continue;
            }

            let remaining = max_length.saturating_sub(context.len() + separator.len());
            if remaining > self.min_remainder && remaining > ELLIPSIS.len() {
                context.push_str(separator);
                context.push_str(truncate_on_char_boundary(&block, remaining - ELLIPSIS.len()));
                context.push_str(ELLIPSIS);
            }
            break;
        }

        context
    }
}

/// Cut `text` to at most `max_bytes`, backing off to a character boundary.
fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut cut = max_bytes;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ChunkMetadata, DocumentChunk, DocumentSummary};

    fn result(file_name: &str, text: &str) -> SearchResult {
        SearchResult {
            chunk: DocumentChunk {
                id: "d_0".to_string(),
                document_id: "d".to_string(),
                text: text.to_string(),
                chunk_index: 0,
                start_offset: 0,
                end_offset: 10,
                embedding: vec![],
                metadata: ChunkMetadata { word_count: 10, section: "content".to_string() },
            },
            score: 0.9,
            document: DocumentSummary {
                document_id: "d".to_string(),
                file_name: file_name.to_string(),
                category: "reports".to_string(),
            },
        }
    }

    #[test]
    fn blocks_are_tagged_with_source_file() {
        let assembler = ContextAssembler::default();
        let blob = assembler.assemble(&[result("report.txt", "revenue grew")], 1000);
        assert_eq!(blob, "[Source: report.txt]\nrevenue grew");
    }

    #[test]
    fn results_are_joined_in_rank_order() {
        let assembler = ContextAssembler::default();
        let results = [result("a.txt", "first"), result("b.txt", "second")];
        let blob = assembler.assemble(&results, 1000);
        assert_eq!(blob, "[Source: a.txt]\nfirst\n\n[Source: b.txt]\nsecond");
    }

    #[test]
    fn output_never_exceeds_max_length() {
        let assembler = ContextAssembler::default();
        let long = "word ".repeat(200);
        let results = [result("a.txt", &long), result("b.txt", &long)];
        for max_length in [0, 50, 120, 500, 1500] {
            let blob = assembler.assemble(&results, max_length);
            assert!(blob.len() <= max_length, "len {} > max {}", blob.len(), max_length);
        }
    }

    #[test]
    fn overflowing_block_is_truncated_with_ellipsis_when_room_remains() {
        let assembler = ContextAssembler::default();
        let long = "word ".repeat(200);
        let blob = assembler.assemble(&[result("a.txt", &long)], 300);
        assert!(blob.len() <= 300);
        assert!(blob.ends_with("..."));
        assert!(blob.starts_with("[Source: a.txt]"));
    }

    #[test]
    fn overflowing_block_is_dropped_when_remainder_is_too_small() {
        let assembler = ContextAssembler::default();
        let results =
            [result("a.txt", &"x ".repeat(100)), result("b.txt", &"y ".repeat(100))];
        // First block fits in ~220 bytes; ~60 bytes of slack is below the
        // 100-byte minimum, so the second block is dropped entirely.
        let blob = assembler.assemble(&results, 280);
        assert!(!blob.contains("b.txt"));
        assert!(!blob.ends_with("..."));
    }

    #[test]
    fn empty_results_give_empty_context() {
        let assembler = ContextAssembler::default();
        assert_eq!(assembler.assemble(&[], 1000), "");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let assembler = ContextAssembler::new(1);
        let blob = assembler.assemble(&[result("a.txt", &"é".repeat(300))], 40);
        assert!(blob.len() <= 40);
        assert!(blob.ends_with("..."));
    }
}
