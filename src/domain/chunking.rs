// src/domain/chunking.rs
use tracing::instrument;
use unicode_segmentation::UnicodeSegmentation;

/// A chunk of text produced by [`split_into_chunks`], before embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    pub chunk_index: usize,
    /// Half-open character span `[start_char, end_char)` in the input text.
    pub start_char: usize,
    pub end_char: usize,
}

#[derive(Debug, Clone)]
struct Sentence {
    text: String,
    tokens: usize,
    start: usize,
    end: usize,
}

/// Segment text into trimmed sentences with token estimates and spans.
///
/// Token counts are whitespace-word estimates, good enough for sizing
/// retrieval passages. Spans are located by forward search from the previous
/// match point, so repeated sentences resolve to distinct positions.
fn segment_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut cursor = 0usize;

    for raw in text.split_sentence_bounds() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let start = text[cursor..]
            .find(trimmed)
            .map(|offset| cursor + offset)
            .unwrap_or(cursor);
        let end = start + trimmed.len();
        cursor = end;

        sentences.push(Sentence {
            text: trimmed.to_string(),
            tokens: trimmed.split_whitespace().count(),
            start,
            end,
        });
    }

    sentences
}

/// Split cleaned text into overlapping, sentence-respecting chunks.
///
/// Chunks are built greedily: sentences accumulate while the running token
/// estimate stays within `target_tokens`, but a chunk always takes at least
/// one sentence, so an oversized sentence becomes a chunk of its own rather
/// than being split. The next chunk starts at the sentence found by walking
/// backward from the end of the current chunk until `overlap_tokens` worth of
/// text has been re-covered. With overlap 0, or when no backward start would
/// make progress, the cursor advances past the current chunk instead.
///
/// Empty or whitespace-only input yields no chunks.
#[instrument(skip(text), fields(len = text.len()))]
pub fn split_into_chunks(
    text: &str,
    target_tokens: usize,
    overlap_tokens: usize,
) -> Vec<TextChunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let sentences = segment_sentences(text);
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut cursor = 0usize;

    while cursor < sentences.len() {
        // Accumulate sentences while under the target; always take the first.
        let mut tokens = 0usize;
        let mut next = cursor;
        while next < sentences.len() {
            let sentence_tokens = sentences[next].tokens;
            if next == cursor || tokens + sentence_tokens <= target_tokens {
                tokens += sentence_tokens;
                next += 1;
            } else {
                break;
            }
        }

        let included = &sentences[cursor..next];
        let text_joined = included
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        chunks.push(TextChunk {
            text: text_joined,
            chunk_index: chunks.len(),
            start_char: included[0].start,
            end_char: included[included.len() - 1].end,
        });

        if next >= sentences.len() {
            break;
        }

        cursor = next_chunk_start(&sentences, cursor, next, overlap_tokens);
    }

    chunks
}

/// Walk backward from the end of the current chunk to find where the next
/// chunk starts. Returns an index strictly greater than `cursor`.
fn next_chunk_start(
    sentences: &[Sentence],
    cursor: usize,
    chunk_end: usize,
    overlap_tokens: usize,
) -> usize {
    if overlap_tokens == 0 {
        return chunk_end;
    }

    let mut accumulated = 0usize;
    let mut start = None;
    for k in (cursor..chunk_end).rev() {
        accumulated += sentences[k].tokens;
        if accumulated >= overlap_tokens {
            start = Some(k);
            break;
        }
    }

    // No backward point that also makes progress (overlap at or beyond the
    // whole chunk): advance one sentence past the cursor instead.
    match start {
        Some(k) if k > cursor => k,
        _ => cursor + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_block(count: usize, words_per_sentence: usize) -> String {
        (0..count)
            .map(|i| {
                let words = (0..words_per_sentence)
                    .map(|w| format!("W{}x{}", i, w))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{}.", words)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn given_empty_input_when_chunking_then_no_chunks() {
        assert!(split_into_chunks("", 400, 50).is_empty());
        assert!(split_into_chunks("   \n\t  ", 400, 50).is_empty());
    }

    #[test]
    fn given_short_input_when_chunking_then_single_chunk_equals_input() {
        let text = "Rust compiles to native code. It has no garbage collector.";
        let chunks = split_into_chunks(text, 400, 50);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].start_char, 0);
        assert_eq!(chunks[0].end_char, text.len());
    }

    #[test]
    fn given_zero_overlap_when_chunking_then_chunks_share_no_sentence() {
        // 6 sentences x 5 tokens, target 10 -> three chunks of two sentences.
        let text = sentence_block(6, 5);
        let chunks = split_into_chunks(&text, 10, 0);

        assert_eq!(chunks.len(), 3);
        for window in chunks.windows(2) {
            let left: Vec<&str> = window[0].text.split(". ").collect();
            let right: Vec<&str> = window[1].text.split(". ").collect();
            for sentence in &left {
                assert!(!right.contains(sentence));
            }
        }
        // Every sentence is covered exactly once.
        let rejoined = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn given_overlap_when_chunking_then_tail_sentences_repeat() {
        // 4 sentences x 5 tokens, target 10, overlap 5 -> each chunk restarts
        // at the previous chunk's last sentence.
        let text = sentence_block(4, 5);
        let chunks = split_into_chunks(&text, 10, 5);

        assert!(chunks.len() > 2);
        for window in chunks.windows(2) {
            let last_left = window[0].text.split(". ").last().unwrap();
            assert!(window[1].text.starts_with(last_left.trim_end_matches('.')));
        }
    }

    #[test]
    fn given_oversized_sentence_when_chunking_then_it_becomes_own_chunk() {
        let long = sentence_block(1, 50);
        let text = format!("Short one. {}", long);
        let chunks = split_into_chunks(&text, 10, 0);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Short one.");
        assert_eq!(chunks[1].text, long);
    }

    #[test]
    fn given_overlap_larger_than_chunk_when_chunking_then_still_terminates() {
        let text = sentence_block(5, 5);
        let chunks = split_into_chunks(&text, 10, 1000);

        // Forced single-sentence progress: one chunk per cursor position.
        assert!(!chunks.is_empty());
        assert!(chunks.len() <= 5);
        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
        let expected: Vec<usize> = (0..chunks.len()).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn given_any_input_when_chunking_then_indices_contiguous_and_spans_valid() {
        let text = sentence_block(9, 7);
        let chunks = split_into_chunks(&text, 20, 7);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
            assert!(chunk.start_char < chunk.end_char);
            assert!(chunk.end_char <= text.len());
            // The span brackets the chunk's first and last sentence.
            let span = &text[chunk.start_char..chunk.end_char];
            let first_sentence = chunk.text.split(". ").next().unwrap();
            assert!(span.starts_with(first_sentence.split(' ').next().unwrap()));
        }
    }

    #[test]
    fn given_same_input_when_chunking_twice_then_identical_output() {
        let text = sentence_block(12, 6);
        let first = split_into_chunks(&text, 25, 10);
        let second = split_into_chunks(&text, 25, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn given_repeated_sentences_when_segmenting_then_spans_advance() {
        let text = "Same words here. Same words here. Same words here.";
        let chunks = split_into_chunks(text, 3, 0);

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].start_char < chunks[1].start_char);
        assert!(chunks[1].start_char < chunks[2].start_char);
        assert_eq!(&text[chunks[2].start_char..chunks[2].end_char], "Same words here.");
    }
}
