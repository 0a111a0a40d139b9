// src/domain/chunk.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A passage of cleaned article text with its embedding, ready for storage.
///
/// Chunks belong wholly to one bookmark; re-ingesting that bookmark replaces
/// its entire chunk set. `chunk_index` is 0-based and contiguous per bookmark,
/// `start_char`/`end_char` is the half-open span in the cleaned text.
#[derive(Clone, PartialEq)]
pub struct Chunk {
    pub chunk_id: String,
    pub bookmark_url: String,
    pub text: String,
    pub chunk_index: usize,
    pub start_char: usize,
    pub end_char: usize,
    pub embedding: Vec<f32>,
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("chunk_id", &self.chunk_id)
            .field("bookmark_url", &self.bookmark_url)
            .field("chunk_index", &self.chunk_index)
            .field("start_char", &self.start_char)
            .field("end_char", &self.end_char)
            .field("text_len", &self.text.len())
            .field("embedding_dim", &self.embedding.len())
            .finish()
    }
}

/// Bookmark metadata carried alongside a retrieved chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSource {
    pub url: String,
    pub title: String,
    pub folder: String,
    pub domain: String,
    pub date_added: DateTime<Utc>,
}

/// A search hit: chunk text, cosine similarity, and the owning bookmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub similarity: f32,
    pub source: ChunkSource,
}

impl RetrievedChunk {
    pub fn similarity_percentage(&self) -> String {
        format!("{:.1}%", self.similarity * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_percentage_format() {
        let chunk = RetrievedChunk {
            text: "text".to_string(),
            similarity: 0.756,
            source: ChunkSource {
                url: "https://example.com".to_string(),
                title: "Example".to_string(),
                folder: "".to_string(),
                domain: "example.com".to_string(),
                date_added: Utc::now(),
            },
        };
        assert_eq!(chunk.similarity_percentage(), "75.6%");
    }
}
