// src/infrastructure/fetcher.rs
use crate::domain::services::fetcher::{
    FetchFailure, FetchResult, FetchSuccess, PageFetcher, RobotsPolicy,
};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Some sites serve empty or blocking pages to obvious bots; realistic
/// browser headers keep the success rate of a personal re-fetch high.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Blocking page fetcher: one request per url, fixed timeout, courtesy delay
/// before each request, redirects followed, HTML-only allow-list.
pub struct HttpPageFetcher {
    client: Client,
    robots: Arc<dyn RobotsPolicy>,
    courtesy_delay: Duration,
}

impl fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("courtesy_delay", &self.courtesy_delay)
            .field("robots", &self.robots)
            .finish()
    }
}

impl HttpPageFetcher {
    pub fn new(
        timeout: Duration,
        courtesy_delay: Duration,
        robots: Arc<dyn RobotsPolicy>,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new()); // Fallback to default client in case of builder failure

        Self {
            client,
            robots,
            courtesy_delay,
        }
    }
}

impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> FetchResult {
        if !self.robots.is_allowed(url) {
            return Err(FetchFailure::Unknown(
                "disallowed by robots policy".to_string(),
            ));
        }

        std::thread::sleep(self.courtesy_delay);

        let response = self.client.get(url).send().map_err(classify_error)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(FetchFailure::Http(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !is_html_content_type(&content_type) {
            return Err(FetchFailure::NonHtml(content_type));
        }

        let content = response.text().map_err(classify_error)?;
        debug!(status = status.as_u16(), len = content.len(), "fetched page");

        Ok(FetchSuccess {
            content,
            status: status.as_u16(),
            content_type,
        })
    }
}

fn classify_error(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Connection(error.to_string())
    } else {
        FetchFailure::Unknown(error.to_string())
    }
}

pub(crate) fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::fetcher::PermissiveRobotsPolicy;

    #[test]
    fn test_html_content_type_allow_list() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("application/pdf"));
        assert!(!is_html_content_type(""));
    }

    #[test]
    fn test_robots_denial_short_circuits_before_any_request() {
        #[derive(Debug)]
        struct DenyAll;
        impl RobotsPolicy for DenyAll {
            fn is_allowed(&self, _url: &str) -> bool {
                false
            }
        }

        // Zero delay: a denial must return without sleeping or dialing out.
        let fetcher = HttpPageFetcher::new(
            Duration::from_secs(1),
            Duration::ZERO,
            Arc::new(DenyAll),
        );
        let result = fetcher.fetch("https://unreachable.invalid/");
        assert_eq!(
            result,
            Err(FetchFailure::Unknown("disallowed by robots policy".to_string()))
        );
    }

    #[test]
    fn test_connection_error_classification() {
        let fetcher = HttpPageFetcher::new(
            Duration::from_secs(2),
            Duration::ZERO,
            Arc::new(PermissiveRobotsPolicy),
        );
        // RFC 2606 reserved TLD: resolution fails without touching the network.
        let result = fetcher.fetch("https://does-not-exist.invalid/");
        match result {
            Err(FetchFailure::Connection(_)) | Err(FetchFailure::Unknown(_)) => {}
            other => panic!("expected connection-class failure, got {:?}", other),
        }
    }
}
