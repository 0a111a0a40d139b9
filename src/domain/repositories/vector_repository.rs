// src/domain/repositories/vector_repository.rs

use crate::domain::bookmark::Bookmark;
use crate::domain::chunk::{Chunk, RetrievedChunk};
use crate::domain::error::DomainError;
use crate::domain::search::SearchFilters;

/// Repository trait for bookmark metadata and chunk vectors.
///
/// Methods speak in domain terms; the persistence mechanism stays behind the
/// interface so tests can substitute an alternative implementation. Two
/// invariants every implementation must uphold:
///
/// * `upsert_bookmark` keyed by url: at most one row per url, ever.
/// * `replace_chunks` is atomic: readers of the same url observe either the
///   complete old chunk set or the complete new one, never a mix.
pub trait VectorRepository: Send + Sync + std::fmt::Debug {
    /// Insert the bookmark or update the existing row with the same url,
    /// refreshing the update marker.
    fn upsert_bookmark(&self, bookmark: &Bookmark) -> Result<(), DomainError>;

    /// Atomically delete all chunks stored for `url` and insert `chunks` in
    /// their place. Rolls back on any insert failure.
    fn replace_chunks(&self, url: &str, chunks: &[Chunk]) -> Result<(), DomainError>;

    /// Get stored bookmark metadata by url.
    fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>, DomainError>;

    /// All bookmark urls currently in the store.
    fn list_all_urls(&self) -> Result<Vec<String>, DomainError>;

    /// Number of chunks stored for `url`.
    fn count_chunks(&self, url: &str) -> Result<usize, DomainError>;

    /// Top-`k` chunks by cosine similarity to `query_embedding`, restricted
    /// by `filters`, joined with their bookmark metadata. Ranked descending;
    /// ties unordered.
    fn similarity_search(
        &self,
        query_embedding: &[f32],
        k: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<RetrievedChunk>, DomainError>;
}
