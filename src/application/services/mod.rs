// src/application/services/mod.rs
pub mod ingestion_service;
pub mod ingestion_service_impl;
pub mod retrieval_service;
pub mod retrieval_service_impl;
