// src/infrastructure/di/mod.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::ingestion_service::{IngestOptions, IngestionService};
use crate::application::services::retrieval_service::RetrievalService;
use crate::application::{IngestionServiceImpl, RetrievalServiceImpl};
use crate::config::{EmbeddingProvider, EmbeddingSettings, Settings};
use crate::domain::embedding::Embedder;
use crate::domain::repositories::vector_repository::VectorRepository;
use crate::domain::services::fetcher::{PageFetcher, PermissiveRobotsPolicy};
use crate::infrastructure::embeddings::{DummyEmbedding, LocalEmbedding, OpenAiEmbedding};
use crate::infrastructure::fetcher::HttpPageFetcher;
use crate::infrastructure::repositories::sqlite::repository::SqliteVectorRepository;
use std::sync::Arc;
use std::time::Duration;

/// Production service container - single source of truth for service creation.
///
/// Built once in `main` from loaded settings and passed by reference to
/// whoever needs services; there is no global state behind it.
pub struct ServiceContainer {
    pub repository: Arc<SqliteVectorRepository>,
    pub embedder: Arc<dyn Embedder>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub ingestion_service: Arc<dyn IngestionService>,
    pub retrieval_service: Arc<dyn RetrievalService>,
}

impl ServiceContainer {
    /// Create all services with explicit dependency injection
    pub fn new(config: &Settings) -> ApplicationResult<Self> {
        let embedder = Self::create_embedder(&config.embedding)?;

        // The store schema has one fixed vector dimension; a mismatched
        // provider would poison every stored chunk.
        if embedder.dimension() != config.embedding.dimension {
            return Err(ApplicationError::Validation(format!(
                "Embedding provider produces {}-dimensional vectors but the store is configured for {}",
                embedder.dimension(),
                config.embedding.dimension
            )));
        }

        let repository = Self::create_repository(&config.db_url, config.embedding.dimension)?;
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(
            Duration::from_secs(config.ingest.fetch_timeout_secs),
            Duration::from_millis(config.ingest.fetch_delay_ms),
            Arc::new(PermissiveRobotsPolicy),
        ));

        let ingestion_service = Arc::new(IngestionServiceImpl::new(
            repository.clone() as Arc<dyn VectorRepository>,
            embedder.clone(),
            fetcher.clone(),
            IngestOptions {
                chunk_size: config.ingest.chunk_size,
                chunk_overlap: config.ingest.chunk_overlap,
            },
        ));

        let retrieval_service = Arc::new(RetrievalServiceImpl::new(
            repository.clone() as Arc<dyn VectorRepository>,
            embedder.clone(),
        ));

        Ok(Self {
            repository,
            embedder,
            fetcher,
            ingestion_service,
            retrieval_service,
        })
    }

    fn create_repository(
        db_url: &str,
        embedding_dim: usize,
    ) -> ApplicationResult<Arc<SqliteVectorRepository>> {
        // Creates the database (and parent directory) and runs all migrations
        let repository = SqliteVectorRepository::from_url(db_url, embedding_dim).map_err(|e| {
            ApplicationError::Other(format!("Failed to create SQLite repository: {}", e))
        })?;

        Ok(Arc::new(repository))
    }

    fn create_embedder(config: &EmbeddingSettings) -> ApplicationResult<Arc<dyn Embedder>> {
        let embedder: Arc<dyn Embedder> = match config.provider {
            EmbeddingProvider::Local => Arc::new(LocalEmbedding::new()?),
            EmbeddingProvider::OpenAi => Arc::new(OpenAiEmbedding::new(
                config.openai_url.clone(),
                config.openai_model.clone(),
            )),
            EmbeddingProvider::Dummy => Arc::new(DummyEmbedding::new(config.dimension)),
        };
        Ok(embedder)
    }
}
