//! Property tests for chunk coverage, similarity bounds, ranking order,
//! and the context length budget.

use chrono::Utc;
use docrag::{
    ChunkMetadata, ContextAssembler, DocumentChunk, DocumentSummary, PipelineConfig,
    ProcessedDocument, SearchOptions, SearchResult, WordChunker, cosine_similarity, rank_chunks,
};
use docrag::chunking::Chunker;
use proptest::prelude::*;

/// Generate a (chunk_size, overlap) pair with overlap < chunk_size.
fn arb_chunk_params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..60).prop_flat_map(|size| (Just(size), 0..size))
}

fn arb_vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
}

fn make_document(id: &str, embeddings: Vec<Vec<f32>>) -> ProcessedDocument {
    let chunks = embeddings
        .into_iter()
        .enumerate()
        .map(|(i, embedding)| DocumentChunk {
            id: format!("{id}_{i}"),
            document_id: id.to_string(),
            text: format!("chunk {i}"),
            chunk_index: i,
            start_offset: i,
            end_offset: i + 1,
            embedding,
            metadata: ChunkMetadata { word_count: 1, section: "content".to_string() },
        })
        .collect();
    ProcessedDocument {
        id: id.to_string(),
        file_name: format!("{id}.txt"),
        file_type: "text/plain".to_string(),
        file_size: 0,
        category: "reports".to_string(),
        description: None,
        session_id: None,
        extracted_text: String::new(),
        chunks,
        fallback_chunks: 0,
        uploaded_at: Utc::now(),
        processed_at: Utc::now(),
    }
}

/// **Chunk coverage**: for N words, chunk size C, overlap O < C, the chunk
/// count is 1 when N ≤ C and ceil((N − O) / (C − O)) otherwise, capped at
/// max_chunks; the final uncapped chunk always ends at N.
mod prop_chunk_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunk_count_matches_coverage_formula(
            (chunk_size, overlap) in arb_chunk_params(),
            word_count in 1usize..400,
            max_chunks in 1usize..30,
        ) {
            let config = PipelineConfig::builder()
                .chunk_size(chunk_size)
                .chunk_overlap(overlap)
                .max_chunks(max_chunks)
                .build()
                .unwrap();
            let text = (0..word_count).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
            let chunks = WordChunker::new(&config).chunk(&text, "doc");

            let step = chunk_size - overlap;
            let expected = if word_count <= chunk_size {
                1
            } else {
                (word_count - overlap).div_ceil(step)
            };
            prop_assert_eq!(chunks.len(), expected.min(max_chunks));

            // Offsets advance by exactly the step, and an uncapped final
            // chunk reaches the end of the text.
            for window in chunks.windows(2) {
                prop_assert_eq!(window[1].start_offset, window[0].start_offset + step);
            }
            if expected <= max_chunks {
                prop_assert_eq!(chunks.last().unwrap().end_offset, word_count);
            }
            for chunk in &chunks {
                prop_assert!(chunk.end_offset - chunk.start_offset <= chunk_size);
                prop_assert_eq!(chunk.metadata.word_count, chunk.end_offset - chunk.start_offset);
            }
        }
    }
}

/// **Similarity symmetry & bounds**: sim(a,b) = sim(b,a); sim(a,a) = 1 for
/// nonzero a; sim is 0 for zero vectors or mismatched lengths; |sim| ≤ 1.
mod prop_similarity {
    use super::*;

    proptest! {
        #[test]
        fn similarity_is_symmetric_and_bounded(
            a in arb_vector(16),
            b in arb_vector(16),
        ) {
            let ab = cosine_similarity(&a, &b);
            let ba = cosine_similarity(&b, &a);
            prop_assert_eq!(ab, ba);
            prop_assert!(ab.abs() <= 1.0 + 1e-5);
        }

        #[test]
        fn self_similarity_of_nonzero_vector_is_one(a in arb_vector(16)) {
            let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            prop_assume!(norm > 1e-3);
            prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-4);
        }

        #[test]
        fn zero_vector_and_length_mismatch_score_zero(a in arb_vector(16)) {
            prop_assert_eq!(cosine_similarity(&a, &vec![0.0; 16]), 0.0);
            prop_assert_eq!(cosine_similarity(&a, &a[..8]), 0.0);
        }
    }
}

/// **Ranking monotonicity**: scores are non-increasing, every score is at
/// least min_similarity, and at most top_k results are returned.
mod prop_ranking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_are_monotonic_thresholded_and_bounded(
            embeddings in proptest::collection::vec(arb_vector(8), 0..25),
            query in arb_vector(8),
            top_k in 1usize..10,
            min_similarity in 0.0f32..1.0,
        ) {
            let documents = vec![make_document("d1", embeddings)];
            let options = SearchOptions { top_k, min_similarity, categories: None };
            let results = rank_chunks(&query, &documents, &options);

            prop_assert!(results.len() <= top_k);
            for result in &results {
                prop_assert!(result.score >= min_similarity);
            }
            for window in results.windows(2) {
                prop_assert!(window[0].score >= window[1].score);
            }
        }
    }
}

/// **Context length bound**: the assembled blob never exceeds max_length,
/// for any results and any budget.
mod prop_context_bound {
    use super::*;

    fn arb_results() -> impl Strategy<Value = Vec<SearchResult>> {
        proptest::collection::vec(("[a-z]{1,12}", "[a-zA-Z ]{0,300}"), 0..8).prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (file_name, text))| SearchResult {
                    chunk: DocumentChunk {
                        id: format!("d_{i}"),
                        document_id: "d".to_string(),
                        text,
                        chunk_index: i,
                        start_offset: 0,
                        end_offset: 0,
                        embedding: vec![],
                        metadata: ChunkMetadata { word_count: 0, section: "content".to_string() },
                    },
                    score: 1.0 - i as f32 * 0.1,
                    document: DocumentSummary {
                        document_id: "d".to_string(),
                        file_name: format!("{file_name}.txt"),
                        category: "reports".to_string(),
                    },
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn assembled_context_never_exceeds_budget(
            results in arb_results(),
            max_length in 0usize..2000,
        ) {
            let assembler = ContextAssembler::default();
            let blob = assembler.assemble(&results, max_length);
            prop_assert!(blob.len() <= max_length);
        }
    }
}
