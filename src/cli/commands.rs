// src/cli/commands.rs
use crate::application::services::ingestion_service::IngestionService;
use crate::application::services::retrieval_service::RetrievalService;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::events::ProgressEvent;
use crate::domain::repositories::vector_repository::VectorRepository;
use crate::domain::search::SearchFilters;
use crate::infrastructure::di::ServiceContainer;
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::Path;
use tracing::instrument;

#[instrument(skip(services))]
pub fn ingest(services: &ServiceContainer, file: &Path, is_json: bool) -> CliResult<()> {
    let export_html = fs::read_to_string(file)
        .map_err(|e| CliError::InvalidInput(format!("Cannot read {}: {}", file.display(), e)))?;

    let events = services.ingestion_service.ingest(export_html);

    for event in events {
        if is_json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", display_event(&event));
        }
    }

    Ok(())
}

fn display_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Parsing { message } => message.clone(),
        ProgressEvent::ParsingComplete { message, .. } => message.clone(),
        ProgressEvent::Processing {
            current,
            total,
            url,
            ..
        } => {
            format!("[{}/{}] {}", current, total, url)
        }
        ProgressEvent::Failed { url, reason } => format!("  failed: {} ({})", url, reason),
        ProgressEvent::Error { url, message } => format!("  error: {} ({})", url, message),
        ProgressEvent::Completed {
            success, failed, ..
        } => {
            format!("Done: {} indexed, {} failed", success, failed)
        }
    }
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(services, settings))]
pub fn search(
    services: &ServiceContainer,
    settings: &Settings,
    query: &str,
    limit: Option<usize>,
    folder: Option<String>,
    domain: Option<String>,
    date_from: Option<&str>,
    date_to: Option<&str>,
    is_json: bool,
) -> CliResult<()> {
    let mut filters = SearchFilters {
        folder,
        domain,
        ..Default::default()
    };
    filters.date_from = date_from.map(|d| parse_date(d, false)).transpose()?;
    filters.date_to = date_to.map(|d| parse_date(d, true)).transpose()?;

    let k = limit.unwrap_or(settings.search.top_k);
    let results = services.retrieval_service.retrieve(query, k, &filters)?;

    if is_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matching passages.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. [{}] {} <{}>",
            i + 1,
            result.similarity_percentage(),
            result.source.title,
            result.source.url
        );
        if !result.source.folder.is_empty() {
            println!("   folder: {}", result.source.folder);
        }
        println!("   {}", snippet(&result.text, 240));
    }

    Ok(())
}

/// Inclusive day bound: start-of-day for `from`, end-of-day for `to`.
fn parse_date(value: &str, end_of_day: bool) -> CliResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CliError::InvalidInput(format!("Invalid date (expected YYYY-MM-DD): {}", value)))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    let naive = time
        .ok_or_else(|| CliError::InvalidInput(format!("Invalid date: {}", value)))?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

#[instrument(skip(services))]
pub fn list(services: &ServiceContainer) -> CliResult<()> {
    let urls = services.repository.list_all_urls().map_err(CliError::from)?;
    for url in urls {
        println!("{}", url);
    }
    Ok(())
}

#[instrument(skip(services))]
pub fn info(services: &ServiceContainer, url: &str) -> CliResult<()> {
    match services.repository.get_by_url(url).map_err(CliError::from)? {
        Some(bookmark) => {
            let chunk_count = services.repository.count_chunks(url).map_err(CliError::from)?;
            println!("url:        {}", bookmark.url);
            println!("title:      {}", bookmark.title);
            println!("folder:     {}", bookmark.folder);
            println!("domain:     {}", bookmark.domain);
            println!("status:     {}", bookmark.status);
            println!("date added: {}", bookmark.date_added.format("%Y-%m-%d %H:%M:%S"));
            println!("chunks:     {}", chunk_count);
        }
        None => {
            println!("No bookmark stored for {}", url);
        }
    }
    Ok(())
}
