// src/infrastructure/embeddings/local_provider.rs
use crate::domain::embedding::Embedder;
use crate::domain::error::{DomainError, DomainResult};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::any::Any;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Local embedding model via fastembed (all-MiniLM-L6-v2, 384 dimensions).
///
/// The first construction downloads the ONNX model into the fastembed cache
/// directory; subsequent runs are offline.
pub struct LocalEmbedding {
    model: Mutex<TextEmbedding>,
    dimension: usize,
}

impl fmt::Debug for LocalEmbedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEmbedding")
            .field("model", &"all-MiniLM-L6-v2")
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl LocalEmbedding {
    #[instrument]
    pub fn new() -> DomainResult<Self> {
        debug!("initializing local embedding model");
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| {
            DomainError::EmbeddingFailed(format!("failed to load local embedding model: {}", e))
        })?;

        Ok(Self {
            model: Mutex::new(model),
            dimension: 384,
        })
    }

    fn run(&self, texts: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let mut model = self.model.lock().map_err(|_| {
            DomainError::EmbeddingFailed("embedding model lock poisoned".to_string())
        })?;
        model
            .embed(texts, None)
            .map_err(|e| DomainError::EmbeddingFailed(format!("local embedding failed: {}", e)))
    }
}

impl Embedder for LocalEmbedding {
    fn embed_single(&self, text: &str) -> DomainResult<Vec<f32>> {
        let mut embeddings = self.run(vec![text.to_string()])?;
        if embeddings.is_empty() {
            return Err(DomainError::EmbeddingFailed(
                "local model returned no embedding".to_string(),
            ));
        }
        Ok(embeddings.remove(0))
    }

    fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self.run(texts.to_vec())?;
        if embeddings.len() != texts.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "local model returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
