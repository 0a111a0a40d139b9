// src/application/services/retrieval_service_impl.rs
use crate::application::error::ApplicationResult;
use crate::application::services::retrieval_service::RetrievalService;
use crate::domain::chunk::RetrievedChunk;
use crate::domain::embedding::Embedder;
use crate::domain::repositories::vector_repository::VectorRepository;
use crate::domain::search::SearchFilters;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct RetrievalServiceImpl {
    repository: Arc<dyn VectorRepository>,
    embedder: Arc<dyn Embedder>,
}

impl RetrievalServiceImpl {
    pub fn new(repository: Arc<dyn VectorRepository>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            repository,
            embedder,
        }
    }
}

impl RetrievalService for RetrievalServiceImpl {
    #[instrument(skip(self), level = "debug")]
    fn retrieve(
        &self,
        query: &str,
        k: usize,
        filters: &SearchFilters,
    ) -> ApplicationResult<Vec<RetrievedChunk>> {
        if query.trim().is_empty() {
            debug!("empty query, skipping retrieval");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_single(query)?;
        let results = self
            .repository
            .similarity_search(&query_embedding, k, filters)?;

        debug!(count = results.len(), "retrieved chunks");
        Ok(results)
    }
}
