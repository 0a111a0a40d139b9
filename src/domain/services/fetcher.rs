// src/domain/services/fetcher.rs
use std::fmt::Debug;
use thiserror::Error;

/// Successful page fetch: body, final status, and the content type that
/// passed the HTML allow-list.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSuccess {
    pub content: String,
    pub status: u16,
    pub content_type: String,
}

/// Typed fetch failure. These are expected outcomes consumed by the
/// ingestion pipeline, not errors propagated through the error chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchFailure {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("Non-HTML content: {0}")]
    NonHtml(String),

    #[error("{0}")]
    Unknown(String),
}

pub type FetchResult = Result<FetchSuccess, FetchFailure>;

/// Capability for retrieving the raw markup of one url.
pub trait PageFetcher: Send + Sync + Debug {
    fn fetch(&self, url: &str) -> FetchResult;
}

/// Pluggable pre-fetch policy check.
///
/// The shipped default is [`PermissiveRobotsPolicy`]: a personal bookmark
/// tool re-reads pages its owner already chose to save, so everything is
/// allowed. Swap in a stricter implementation for crawler-like deployments.
pub trait RobotsPolicy: Send + Sync + Debug {
    fn is_allowed(&self, url: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct PermissiveRobotsPolicy;

impl RobotsPolicy for PermissiveRobotsPolicy {
    fn is_allowed(&self, _url: &str) -> bool {
        true
    }
}
