// src/infrastructure/embeddings/dummy_provider.rs
use crate::domain::embedding::Embedder;
use crate::domain::error::DomainResult;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic offline embedder: hashed bag-of-words, L2-normalized.
///
/// Identical texts map to identical vectors and token overlap raises cosine
/// similarity, which is enough for tests and offline smoke runs to exercise
/// the full ingest/retrieve path without a model download or an API key.
#[derive(Debug, Clone)]
pub struct DummyEmbedding {
    dimension: usize,
}

impl DummyEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for DummyEmbedding {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for DummyEmbedding {
    fn embed_single(&self, text: &str) -> DomainResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::cosine_similarity;
    use ndarray::Array1;

    #[test]
    fn test_dummy_embedding_is_deterministic() {
        let embedder = DummyEmbedding::default();
        let first = embedder.embed_single("rust systems programming").unwrap();
        let second = embedder.embed_single("rust systems programming").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 384);
    }

    #[test]
    fn test_dummy_embedding_is_normalized() {
        let embedder = DummyEmbedding::new(64);
        let vector = embedder.embed_single("some words to embed").unwrap();
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_similar_texts_score_higher_than_unrelated() {
        let embedder = DummyEmbedding::default();
        let a = Array1::from(embedder.embed_single("rust borrow checker lifetimes").unwrap());
        let b = Array1::from(embedder.embed_single("rust borrow checker ownership").unwrap());
        let c = Array1::from(embedder.embed_single("banana smoothie recipe blog").unwrap());

        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn test_batch_preserves_order_and_empty_input() {
        let embedder = DummyEmbedding::default();
        assert!(embedder.embed_batch(&[]).unwrap().is_empty());

        let texts = vec!["first text".to_string(), "second text".to_string()];
        let batch = embedder.embed_batch(&texts).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed_single("first text").unwrap());
        assert_eq!(batch[1], embedder.embed_single("second text").unwrap());
    }

    #[test]
    fn test_empty_text_yields_zero_vector() {
        let embedder = DummyEmbedding::new(16);
        let vector = embedder.embed_single("").unwrap();
        assert!(vector.iter().all(|v| *v == 0.0));
    }
}
