// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Ask questions of your bookmarks
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[arg(long = "openai", help = "use the OpenAI API to embed content")]
    pub openai: bool,

    #[arg(long = "no-color", help = "disable colored log output")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a browser bookmark export file
    Ingest {
        /// Path to the exported bookmarks HTML file
        file: PathBuf,

        #[arg(long = "json", help = "emit progress events as JSON lines")]
        is_json: bool,
    },
    /// Search indexed bookmark content semantically
    Search {
        /// Natural-language query
        query: String,

        #[arg(short = 'k', long = "limit", help = "number of passages to return")]
        limit: Option<usize>,

        #[arg(long = "folder", help = "only bookmarks in this folder path")]
        folder: Option<String>,

        #[arg(long = "domain", help = "only bookmarks from this domain")]
        domain: Option<String>,

        #[arg(long = "from", value_name = "YYYY-MM-DD", help = "only bookmarks added on or after")]
        date_from: Option<String>,

        #[arg(long = "to", value_name = "YYYY-MM-DD", help = "only bookmarks added on or before")]
        date_to: Option<String>,

        #[arg(long = "json", help = "output results as JSON")]
        is_json: bool,
    },
    /// List all stored bookmark urls
    List,
    /// Show stored metadata for one bookmark
    Info {
        /// Bookmark url
        url: String,
    },
}
