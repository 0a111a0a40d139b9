// src/application/services/retrieval_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::chunk::RetrievedChunk;
use crate::domain::search::SearchFilters;

/// Service interface for retrieving passages relevant to a query.
pub trait RetrievalService: Send + Sync {
    /// Embed `query` once and return the top-`k` most similar chunks that
    /// pass `filters`, ranked by cosine similarity descending.
    ///
    /// An empty or whitespace-only query returns no results without invoking
    /// the embedder.
    fn retrieve(
        &self,
        query: &str,
        k: usize,
        filters: &SearchFilters,
    ) -> ApplicationResult<Vec<RetrievedChunk>>;
}
