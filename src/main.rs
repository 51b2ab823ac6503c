//! # versemend CLI
//!
//! Command-line interface for the versemend reconciliation engine.
//!
//! ## Usage
//!
//! ```bash
//! versemend --config ./config/versemend.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `versemend init` | Create the SQLite database, seed sources and canon |
//! | `versemend sources` | List registered sources and their verse counts |
//! | `versemend stats` | Show per-source coverage against the canon |
//! | `versemend repair [SOURCES]...` | Run a reconciliation pass |
//! | `versemend fetch-verse <SOURCE> <BOOK> <CH> <V>` | Targeted single-verse repair |

mod canon;
mod config;
mod db;
mod fetch;
mod migrate;
mod models;
mod repair;
mod retry;
mod sources;
mod stats;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// versemend — incremental reconciliation for a partitioned scripture corpus.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/versemend.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "versemend",
    about = "versemend — detect and repair gaps in a multi-source scripture corpus",
    version,
    long_about = "versemend compares each (source, book) partition of a SQLite scripture corpus \
    against canonical expected verse counts, fetches missing chapters from a remote provider, \
    and writes verses idempotently so repair passes are safe to re-run at any time."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/versemend.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema and seed canonical data.
    ///
    /// Creates the SQLite database file, the sources/books/verses tables,
    /// and registers the default sources. Idempotent — running it multiple
    /// times is safe and never touches existing verses.
    Init,

    /// List registered sources and their stored verse counts.
    Sources,

    /// Show per-source coverage against the canonical reference.
    Stats,

    /// Run a reconciliation pass.
    ///
    /// Scans each book of each source, skips books at or above the
    /// completeness threshold, fetches incomplete books chapter by chapter,
    /// and reports verses added and an estimate of verses still missing.
    /// Safe to re-run; a failed pass leaves the corpus no worse than before.
    Repair {
        /// Sources to repair (default: all registered sources).
        sources: Vec<String>,

        /// Override the completeness threshold from config (0.0, 1.0].
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Fetch and write a single known-missing verse.
    ///
    /// Uses the provider's finer-grained per-verse endpoint rather than the
    /// bulk chapter request. Reports whether the verse was added, already
    /// present, or unavailable.
    FetchVerse {
        /// Source identifier (e.g. `KJV`).
        source: String,
        /// Book name as stored (e.g. `Ruth`).
        book: String,
        /// Chapter number (1-based).
        chapter: i64,
        /// Verse number (1-based).
        verse: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Sources => {
            sources::list_sources(&cfg).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Repair { sources, threshold } => {
            if let Some(t) = threshold {
                if !(t > 0.0 && t <= 1.0) {
                    anyhow::bail!("--threshold must be in (0.0, 1.0]");
                }
                cfg.repair.completeness_threshold = t;
            }
            repair::run_repair(&cfg, &sources).await?;
        }
        Commands::FetchVerse {
            source,
            book,
            chapter,
            verse,
        } => {
            repair::run_fetch_verse(&cfg, &source, &book, chapter, verse).await?;
        }
    }

    Ok(())
}
