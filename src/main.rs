//! # Repertorium CLI (`rpt`)
//!
//! The `rpt` binary is the primary interface for Repertorium. It provides
//! the offline batch commands that build and compact the repertory
//! artifact, and the runtime commands that search the materia medica
//! block index.
//!
//! ## Usage
//!
//! ```bash
//! rpt --config ./config/rpt.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rpt build` | Parse the raw symptom export into the repertory artifact |
//! | `rpt compact` | Write a size-bounded artifact for distribution |
//! | `rpt search "<query>"` | Ranked search over the materia medica sources |
//! | `rpt sources` | List configured sources and their reachability |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use repertorium::{compact, config, ingest, search, sources};

/// Repertorium — a repertory builder and materia medica search engine for
/// homeopathic reference texts.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/rpt.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "rpt",
    about = "Repertorium — a repertory builder and materia medica search engine",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/rpt.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the repertory artifact from the raw symptom export.
    ///
    /// Reads `[build].source`, parses every record line, and writes the
    /// full artifact JSON to `[build].artifact`. Malformed lines are
    /// skipped; only I/O failures abort the build.
    Build,

    /// Write a size-bounded repertory artifact for distribution.
    ///
    /// Truncates each category to its first N symptoms and each retained
    /// symptom to its first M remedies, preserving order. Bounds come
    /// from `[compact]` in the config.
    Compact,

    /// Search the materia medica sources.
    ///
    /// Builds the block index from the configured sources on first use
    /// and returns ranked substring matches.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List configured materia medica sources and their reachability.
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Build => {
            ingest::run_build(&cfg)?;
        }
        Commands::Compact => {
            compact::run_compact(&cfg)?;
        }
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &query, limit).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg).await?;
        }
    }

    Ok(())
}
