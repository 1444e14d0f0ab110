//! # Migration MCP CLI (`migration-mcp`)
//!
//! ## Usage
//!
//! ```bash
//! migration-mcp --config ./config/migration.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `migration-mcp serve` | Start the HTTP + MCP server |
//! | `migration-mcp search "<query>"` | Search a migration guide |
//! | `migration-mcp sections` | List the sections of a guide |
//! | `migration-mcp checklist` | Print or write the migration checklist |
//!
//! Every command except `serve` falls back to built-in defaults when the
//! config file does not exist.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ai_sdk_migration_mcp::config::{self, Config};
use ai_sdk_migration_mcp::{checklist, search, server, GuideCorpus};

/// Search the AI SDK 5 migration guides and serve them to AI agents.
#[derive(Parser)]
#[command(
    name = "migration-mcp",
    about = "AI SDK 5 migration guide search, checklist generator and MCP server",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/migration.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server with the MCP endpoint at /api/mcp.
    Serve,

    /// Search a migration guide and print the ranked sections.
    Search {
        /// Search query (e.g. "useChat", "maxSteps", "dual write").
        query: String,

        /// Which guide to search: `guide` or `data-guide`.
        #[arg(long, default_value = "guide")]
        corpus: GuideCorpus,

        /// Maximum number of sections to show.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the per-signal score of each hit instead of its content.
        #[arg(long)]
        explain: bool,
    },

    /// List the sections of a guide in document order.
    Sections {
        #[arg(long, default_value = "guide")]
        corpus: GuideCorpus,
    },

    /// Generate the migration checklist.
    Checklist {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The config file if present, otherwise defaults.
fn load_or_minimal(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::minimal())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let cfg = config::load_config(&cli.config)?;
            server::run_server(&cfg).await?;
        }
        Commands::Search {
            query,
            corpus,
            limit,
            explain,
        } => {
            let cfg = load_or_minimal(&cli.config)?;
            search::run_search(&cfg, corpus, &query, limit, explain).await?;
        }
        Commands::Sections { corpus } => {
            let cfg = load_or_minimal(&cli.config)?;
            search::run_sections(&cfg, corpus).await?;
        }
        Commands::Checklist { output } => {
            let cfg = load_or_minimal(&cli.config)?;
            checklist::run_checklist(&cfg, output.as_deref())?;
        }
    }

    Ok(())
}
