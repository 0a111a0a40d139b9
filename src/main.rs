// src/main.rs
use clap::Parser;
use ragmark::cli::args::Cli;
use ragmark::config::{load_settings, EmbeddingProvider, Settings};
use ragmark::exitcode;
use ragmark::infrastructure::di::ServiceContainer;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug, cli.no_color);

    // Load configuration with CLI overrides
    let config_path_ref = cli.config.as_deref();
    let mut settings = load_settings(config_path_ref).unwrap_or_else(|e| {
        debug!("Failed to load settings: {}. Using defaults.", e);
        Settings::default()
    });

    if cli.openai {
        debug!("OpenAI embeddings requested via CLI flag");
        settings.embedding.provider = EmbeddingProvider::OpenAi;
        settings.embedding.dimension = 1536;
    }

    // Create service container (single composition root)
    let services = match ServiceContainer::new(&settings) {
        Ok(container) => container,
        Err(e) => {
            eprintln!("Failed to create service container: {}", e);
            std::process::exit(exitcode::USAGE);
        }
    };

    if let Err(e) = ragmark::cli::execute_command(cli, &services, &settings) {
        eprintln!("Error: {}", e);
        std::process::exit(exitcode::USAGE);
    }
}

fn setup_logging(verbosity: u8, no_color: bool) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Create a noisy module filter
    let noisy_modules = ["html5ever", "reqwest", "mio", "want", "hyper_util", "ort"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Formatted output to stderr keeps stdout pipeable to downstream tools
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // Apply filters to the layer
    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    // Log initial debug level
    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}
