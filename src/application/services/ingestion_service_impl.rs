// src/application/services/ingestion_service_impl.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::ingestion_service::{IngestOptions, IngestionService};
use crate::domain::bookmark::{Bookmark, BookmarkStatus};
use crate::domain::chunk::Chunk;
use crate::domain::chunking::split_into_chunks;
use crate::domain::embedding::Embedder;
use crate::domain::events::ProgressEvent;
use crate::domain::repositories::vector_repository::VectorRepository;
use crate::domain::services::fetcher::PageFetcher;
use crate::infrastructure::cleaner::clean_html;
use crate::infrastructure::netscape::parse_netscape_export;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Per-bookmark result inside a run: either fully indexed, or skipped with a
/// reason worth reporting. Unexpected errors travel through the Result.
enum BookmarkOutcome {
    Indexed,
    Skipped(String),
}

#[derive(Clone)]
pub struct IngestionServiceImpl {
    repository: Arc<dyn VectorRepository>,
    embedder: Arc<dyn Embedder>,
    fetcher: Arc<dyn PageFetcher>,
    options: IngestOptions,
}

impl IngestionServiceImpl {
    pub fn new(
        repository: Arc<dyn VectorRepository>,
        embedder: Arc<dyn Embedder>,
        fetcher: Arc<dyn PageFetcher>,
        options: IngestOptions,
    ) -> Self {
        Self {
            repository,
            embedder,
            fetcher,
            options,
        }
    }

    /// Run the whole pipeline for one bookmark: fetch, clean, chunk, embed,
    /// store. Early exits become `Skipped` with the reason the user sees.
    fn process_bookmark(&self, bookmark: &Bookmark) -> ApplicationResult<BookmarkOutcome> {
        let fetched = match self.fetcher.fetch(&bookmark.url) {
            Ok(success) => success,
            Err(failure) => return Ok(BookmarkOutcome::Skipped(failure.to_string())),
        };

        let Some(text) = clean_html(&fetched.content) else {
            return Ok(BookmarkOutcome::Skipped(
                "No content after cleaning".to_string(),
            ));
        };

        let text_chunks =
            split_into_chunks(&text, self.options.chunk_size, self.options.chunk_overlap);
        if text_chunks.is_empty() {
            return Ok(BookmarkOutcome::Skipped("No chunks generated".to_string()));
        }

        let texts: Vec<String> = text_chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != text_chunks.len() {
            return Err(ApplicationError::Other(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                text_chunks.len()
            )));
        }

        let chunks: Vec<Chunk> = text_chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Chunk {
                chunk_id: Uuid::new_v4().to_string(),
                bookmark_url: bookmark.url.clone(),
                text: chunk.text,
                chunk_index: chunk.chunk_index,
                start_char: chunk.start_char,
                end_char: chunk.end_char,
                embedding,
            })
            .collect();

        let mut indexed = bookmark.clone();
        indexed.set_status(BookmarkStatus::Indexed);
        self.repository.upsert_bookmark(&indexed)?;
        self.repository.replace_chunks(&bookmark.url, &chunks)?;

        debug!(url = %bookmark.url, chunks = chunks.len(), "bookmark indexed");
        Ok(BookmarkOutcome::Indexed)
    }

    /// Best-effort status update on the failure paths; a broken store must
    /// not mask the failure that is being reported.
    fn mark_failed(&self, bookmark: &Bookmark) {
        let mut failed = bookmark.clone();
        failed.set_status(BookmarkStatus::Failed);
        if let Err(e) = self.repository.upsert_bookmark(&failed) {
            warn!(url = %bookmark.url, "failed to record failure status: {}", e);
        }
    }

    #[instrument(skip_all)]
    fn run(&self, export_html: &str, events: &Sender<ProgressEvent>) {
        let _ = events.send(ProgressEvent::parsing());
        let bookmarks = parse_netscape_export(export_html);
        let total = bookmarks.len();
        let _ = events.send(ProgressEvent::parsing_complete(total));

        let mut success_count = 0usize;
        let mut failed_count = 0usize;

        for (i, bookmark) in bookmarks.iter().enumerate() {
            let _ = events.send(ProgressEvent::Processing {
                current: i + 1,
                total,
                url: bookmark.url.clone(),
                title: bookmark.title.clone(),
            });

            match self.process_bookmark(bookmark) {
                Ok(BookmarkOutcome::Indexed) => {
                    success_count += 1;
                }
                Ok(BookmarkOutcome::Skipped(reason)) => {
                    failed_count += 1;
                    self.mark_failed(bookmark);
                    let _ = events.send(ProgressEvent::Failed {
                        url: bookmark.url.clone(),
                        reason,
                    });
                }
                Err(error) => {
                    failed_count += 1;
                    self.mark_failed(bookmark);
                    let _ = events.send(ProgressEvent::Error {
                        url: bookmark.url.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        info!(success = success_count, failed = failed_count, "ingestion run finished");
        let _ = events.send(ProgressEvent::completed(success_count, failed_count));
    }
}

impl IngestionService for IngestionServiceImpl {
    fn ingest(&self, export_html: String) -> Receiver<ProgressEvent> {
        let (tx, rx) = channel();
        let service = self.clone();

        thread::spawn(move || {
            service.run(&export_html, &tx);
            // tx drops here, closing the channel.
        });

        rx
    }
}
