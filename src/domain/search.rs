// src/domain/search.rs
use chrono::{DateTime, Utc};

/// Conjunctive metadata filters for similarity search.
///
/// Absent fields do not constrain the result; present fields combine with
/// logical AND. The date range is inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub folder: Option<String>,
    pub domain: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.folder.is_none()
            && self.domain.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_are_empty() {
        assert!(SearchFilters::default().is_empty());
        assert!(!SearchFilters::default().with_folder("dev").is_empty());
    }
}
