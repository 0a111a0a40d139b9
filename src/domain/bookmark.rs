// src/domain/bookmark.rs
use crate::domain::error::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Indexing state of a bookmark within the store.
///
/// A parsed bookmark starts out `Pending`; each ingestion pass settles it to
/// `Indexed` or `Failed`. Re-ingesting the same url resets the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkStatus {
    Pending,
    Indexed,
    Failed,
}

impl BookmarkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkStatus::Pending => "pending",
            BookmarkStatus::Indexed => "indexed",
            BookmarkStatus::Failed => "failed",
        }
    }
}

impl FromStr for BookmarkStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookmarkStatus::Pending),
            "indexed" => Ok(BookmarkStatus::Indexed),
            "failed" => Ok(BookmarkStatus::Failed),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for BookmarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a bookmark domain entity.
///
/// The url is the identity key: parsing the same export twice or re-ingesting
/// a url updates the existing record instead of creating a second one.
#[derive(Builder, Clone, PartialEq)]
#[builder(setter(into))]
pub struct Bookmark {
    pub url: String,
    pub title: String,
    /// Ancestor folder names joined by `/`, empty at the export root.
    pub folder: String,
    pub date_added: DateTime<Utc>,
    #[builder(default)]
    pub icon: Option<String>,
    /// Host component of the url, empty if the url does not parse.
    pub domain: String,
    #[builder(default = "BookmarkStatus::Pending")]
    pub status: BookmarkStatus,
    #[builder(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[builder(default = "Utc::now()")]
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a freshly parsed bookmark, deriving the domain from the url.
    pub fn new<S: Into<String>>(
        url: S,
        title: S,
        folder: S,
        date_added: DateTime<Utc>,
        icon: Option<String>,
    ) -> Self {
        let url = url.into();
        let domain = domain_of(&url);
        Self {
            url,
            title: title.into(),
            folder: folder.into(),
            date_added,
            icon,
            domain,
            status: BookmarkStatus::Pending,
            created_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Reconstruct a bookmark from its storage representation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        url: String,
        title: String,
        folder: String,
        date_added: DateTime<Utc>,
        domain: String,
        status: String,
        created_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            url,
            title,
            folder,
            date_added,
            icon: None,
            domain,
            status: status.parse()?,
            created_at,
            updated_at,
        })
    }

    pub fn set_status(&mut self, status: BookmarkStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Folder path segments in root-to-leaf order.
    pub fn folder_segments(&self) -> Vec<&str> {
        if self.folder.is_empty() {
            Vec::new()
        } else {
            self.folder.split('/').collect()
        }
    }
}

/// Host component of a url, empty when the url does not parse as absolute.
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.status, self.title, self.url, self.folder
        )
    }
}

impl fmt::Debug for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bookmark")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("folder", &self.folder)
            .field("date_added", &self.date_added)
            .field("icon", &self.icon.as_ref().map(|_| "[...]"))
            .field("domain", &self.domain)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
