// tests/common/mod.rs
#![allow(dead_code)]

use ragmark::domain::embedding::Embedder;
use ragmark::domain::error::{DomainError, DomainResult};
use ragmark::domain::services::fetcher::{
    FetchFailure, FetchResult, FetchSuccess, PageFetcher,
};
use ragmark::infrastructure::embeddings::DummyEmbedding;
use ragmark::infrastructure::repositories::sqlite::repository::SqliteVectorRepository;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Small vectors keep the fixtures fast; dimension is a repository
/// parameter, so tests pick their own.
pub const TEST_DIM: usize = 64;

pub fn setup_repository() -> (TempDir, Arc<SqliteVectorRepository>) {
    ragmark::util::testing::init_test_env();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("ragmark.db");
    let repository = SqliteVectorRepository::from_url(db_path.to_str().unwrap(), TEST_DIM)
        .expect("Failed to create repository");
    (dir, Arc::new(repository))
}

pub fn test_embedder() -> Arc<DummyEmbedding> {
    Arc::new(DummyEmbedding::new(TEST_DIM))
}

/// An article long enough to clear the cleaner's 100-character gate and wide
/// enough to produce several chunks at small chunk sizes.
pub fn article_html(topic: &str) -> String {
    let sentences: String = (0..30)
        .map(|i| {
            format!(
                "Paragraph {} explains how {} works in practice with several details. ",
                i, topic
            )
        })
        .collect();
    format!(
        "<html><body><nav>Menu</nav><article><p>{}</p></article><footer>(c)</footer></body></html>",
        sentences
    )
}

/// A page that cleans down to less than 100 characters.
pub fn thin_html() -> String {
    "<html><body><p>Almost nothing here.</p></body></html>".to_string()
}

/// Two-bookmark export: one destined to succeed, one to fail.
pub fn export_html(good_url: &str, bad_url: &str) -> String {
    format!(
        r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<DL><p>
    <DT><H3 ADD_DATE="1700000000">Reading</H3>
    <DL><p>
        <DT><A HREF="{}" ADD_DATE="1700000100">Good Article</A>
        <DT><A HREF="{}" ADD_DATE="1700000200">Gone Page</A>
    </DL><p>
</DL>"#,
        good_url, bad_url
    )
}

/// Canned fetcher: serves a fixed outcome per url, connection error for
/// anything unexpected. No network, no delays.
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: HashMap<String, FetchResult>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(FetchSuccess {
                content: html,
                status: 200,
                content_type: "text/html; charset=utf-8".to_string(),
            }),
        );
        self
    }

    pub fn with_failure(mut self, url: &str, failure: FetchFailure) -> Self {
        self.responses.insert(url.to_string(), Err(failure));
        self
    }
}

impl PageFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> FetchResult {
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchFailure::Connection(format!("no stub for {}", url))))
    }
}

/// Wraps the dummy embedder and counts invocations, for asserting the
/// empty-query short-circuit.
#[derive(Debug)]
pub struct CountingEmbedder {
    inner: DummyEmbedding,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: DummyEmbedding::new(dimension),
            single_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

impl Embedder for CountingEmbedder {
    fn embed_single(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_single(text)
    }

    fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An embedder that always fails, to drive the orchestrator's error path.
#[derive(Debug)]
pub struct FailingEmbedder {
    dimension: usize,
}

impl FailingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Embedder for FailingEmbedder {
    fn embed_single(&self, _text: &str) -> DomainResult<Vec<f32>> {
        Err(DomainError::EmbeddingFailed("embedder offline".to_string()))
    }

    fn embed_batch(&self, _texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        Err(DomainError::EmbeddingFailed("embedder offline".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
