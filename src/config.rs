// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// fastembed all-MiniLM-L6-v2, downloaded on first use (384 dimensions)
    Local,
    /// OpenAI embeddings API, needs OPENAI_API_KEY (1536 dimensions)
    OpenAi,
    /// Deterministic offline hashing, for tests and dry runs
    Dummy,
}

impl FromStr for EmbeddingProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(EmbeddingProvider::Local),
            "openai" => Ok(EmbeddingProvider::OpenAi),
            "dummy" => Ok(EmbeddingProvider::Dummy),
            other => Err(DomainError::Other(format!(
                "Unknown embedding provider: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_provider")]
    pub provider: EmbeddingProvider,

    /// Vector dimension of the chosen provider; the store schema is fixed to
    /// this value (384 for local, 1536 for the default OpenAI model).
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default = "default_openai_url")]
    pub openai_url: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,
}

fn default_provider() -> EmbeddingProvider {
    EmbeddingProvider::Local
}

fn default_dimension() -> usize {
    384
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "text-embedding-ada-002".to_string()
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimension: default_dimension(),
            openai_url: default_openai_url(),
            openai_model: default_openai_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestSettings {
    /// Target chunk size in approximate whitespace tokens
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks, same unit
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Courtesy delay before each outbound request
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
}

fn default_chunk_size() -> usize {
    400
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_fetch_delay_ms() -> u64 {
    500
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fetch_delay_ms: default_fetch_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_url: String,

    #[serde(default)]
    pub embedding: EmbeddingSettings,

    #[serde(default)]
    pub ingest: IngestSettings,

    #[serde(default)]
    pub search: SearchSettings,
}

fn default_db_path() -> String {
    let db_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("../db"))
        .join(".config/ragmark");

    db_dir
        .join("ragmark.db")
        .to_str()
        .unwrap_or("../db/ragmark.db")
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            embedding: EmbeddingSettings::default(),
            ingest: IngestSettings::default(),
            search: SearchSettings::default(),
        }
    }
}

// Load settings from config files and environment variables
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    // Start with default settings
    let mut settings = Settings::default();

    // Explicit config file first, then the standard location
    let config_sources = [
        config_file.map(Path::to_path_buf),
        dirs::home_dir().map(|p| p.join(".config/ragmark/config.toml")),
    ];

    // Load from config files if they exist
    for config_path in config_sources.iter().flatten() {
        if config_path.exists() {
            trace!("Loading config from: {:?}", config_path);

            if let Ok(config_text) = std::fs::read_to_string(config_path) {
                match toml::from_str::<Settings>(&config_text) {
                    Ok(file_settings) => {
                        settings = file_settings;
                        break;
                    }
                    Err(e) => {
                        return Err(DomainError::Other(format!(
                            "Invalid config file {}: {}",
                            config_path.display(),
                            e
                        )));
                    }
                }
            }
        }
    }

    // Override with environment variables
    if let Ok(db_url) = std::env::var("RAGMARK_DB_URL") {
        trace!("Using RAGMARK_DB_URL from environment: {}", db_url);
        settings.db_url = db_url;
    }

    if let Ok(provider) = std::env::var("RAGMARK_EMBEDDING_PROVIDER") {
        trace!(
            "Using RAGMARK_EMBEDDING_PROVIDER from environment: {}",
            provider
        );
        settings.embedding.provider = provider.parse()?;
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::EnvGuard;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    #[test]
    #[serial]
    fn given_no_environment_when_loading_then_defaults() {
        let _guard = EnvGuard::new();
        env::remove_var("RAGMARK_DB_URL");
        env::remove_var("RAGMARK_EMBEDDING_PROVIDER");

        let settings = load_settings(None).unwrap();
        assert!(settings.db_url.contains("ragmark.db"));
        assert_eq!(settings.embedding.provider, EmbeddingProvider::Local);
        assert_eq!(settings.embedding.dimension, 384);
        assert_eq!(settings.ingest.chunk_size, 400);
        assert_eq!(settings.ingest.chunk_overlap, 50);
        assert_eq!(settings.search.top_k, 5);
    }

    #[test]
    #[serial]
    fn given_env_vars_when_loading_then_overrides() {
        let _guard = EnvGuard::new();
        env::set_var("RAGMARK_DB_URL", "/test/ragmark.db");
        env::set_var("RAGMARK_EMBEDDING_PROVIDER", "dummy");

        let settings = load_settings(None).unwrap();
        assert_eq!(settings.db_url, "/test/ragmark.db");
        assert_eq!(settings.embedding.provider, EmbeddingProvider::Dummy);
    }

    #[test]
    #[serial]
    fn given_config_file_when_loading_then_file_values_used() {
        let _guard = EnvGuard::new();
        env::remove_var("RAGMARK_DB_URL");
        env::remove_var("RAGMARK_EMBEDDING_PROVIDER");

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"db_url = "/from/file.db"

[embedding]
provider = "openai"
dimension = 1536

[ingest]
chunk_size = 200
"#
        )
        .unwrap();

        let settings = load_settings(Some(&config_path)).unwrap();
        assert_eq!(settings.db_url, "/from/file.db");
        assert_eq!(settings.embedding.provider, EmbeddingProvider::OpenAi);
        assert_eq!(settings.embedding.dimension, 1536);
        assert_eq!(settings.ingest.chunk_size, 200);
        // Unset fields fall back to defaults
        assert_eq!(settings.ingest.chunk_overlap, 50);
    }

    #[test]
    fn given_provider_strings_when_parsing_then_roundtrip() {
        assert_eq!(
            "local".parse::<EmbeddingProvider>().unwrap(),
            EmbeddingProvider::Local
        );
        assert_eq!(
            "OpenAI".parse::<EmbeddingProvider>().unwrap(),
            EmbeddingProvider::OpenAi
        );
        assert!("word2vec".parse::<EmbeddingProvider>().is_err());
    }
}
