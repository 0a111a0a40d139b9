// src/domain/events.rs
use serde::Serialize;

/// Progress event emitted while ingesting a bookmark export.
///
/// One ingestion run produces, in order: `Parsing`, `ParsingComplete`, then
/// per bookmark one `Processing` plus at most one `Failed`/`Error`, and a
/// final `Completed` with aggregate counts. The serialized form tags the
/// variant under `status` so downstream surfaces can re-emit events verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressEvent {
    Parsing {
        message: String,
    },
    ParsingComplete {
        total: usize,
        message: String,
    },
    Processing {
        current: usize,
        total: usize,
        url: String,
        title: String,
    },
    /// Expected per-bookmark failure with a specific reason (fetch outcome,
    /// empty cleaning result, no chunks).
    Failed {
        url: String,
        reason: String,
    },
    /// Unexpected per-bookmark error, caught and stringified.
    Error {
        url: String,
        message: String,
    },
    Completed {
        success: usize,
        failed: usize,
        message: String,
    },
}

impl ProgressEvent {
    pub fn parsing() -> Self {
        ProgressEvent::Parsing {
            message: "Parsing bookmark export...".to_string(),
        }
    }

    pub fn parsing_complete(total: usize) -> Self {
        ProgressEvent::ParsingComplete {
            total,
            message: format!("Found {} bookmarks", total),
        }
    }

    pub fn completed(success: usize, failed: usize) -> Self {
        ProgressEvent::Completed {
            success,
            failed,
            message: "Ingestion complete".to_string(),
        }
    }
}
