// src/util/testing.rs

use std::env;
use std::sync::OnceLock;
use tracing::{debug, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_LOGGING: OnceLock<()> = OnceLock::new();

/// Initializes test logging exactly once across the test binary.
pub fn init_test_env() {
    TEST_LOGGING.get_or_init(|| {
        setup_test_logging();
    });
}

/// Logging setup only runs once; subsequent calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["html5ever", "reqwest", "mio", "want", "hyper_util", "ort"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Saves and restores the ragmark environment variables around a test.
#[derive(Debug, Clone)]
pub struct EnvGuard {
    db_url: Option<String>,
    provider: Option<String>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            db_url: env::var("RAGMARK_DB_URL").ok(),
            provider: env::var("RAGMARK_EMBEDDING_PROVIDER").ok(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        env::remove_var("RAGMARK_DB_URL");
        env::remove_var("RAGMARK_EMBEDDING_PROVIDER");
        if let Some(val) = &self.db_url {
            env::set_var("RAGMARK_DB_URL", val);
        }
        if let Some(val) = &self.provider {
            env::set_var("RAGMARK_EMBEDDING_PROVIDER", val);
        }
    }
}
