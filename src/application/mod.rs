// src/application/mod.rs
pub mod error;
pub mod services;

// Re-export key services for easier imports
pub use services::ingestion_service_impl::IngestionServiceImpl;
pub use services::retrieval_service_impl::RetrievalServiceImpl;
