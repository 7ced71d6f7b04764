//! # KB Curator CLI (`kbc`)
//!
//! The `kbc` binary lets operators inspect and override the answers a
//! chatbot gives, and work through the review queue.
//!
//! ## Usage
//!
//! ```bash
//! kbc --config ./config/kbc.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kbc search <url>` | List documents scraped from a page |
//! | `kbc get <id>` | Show automatic, override, and effective content |
//! | `kbc edit <id> --op ...` | Stage edits on the override, validate, save |
//! | `kbc put <id> <file>` | Save an answer set from a JSON file as the override |
//! | `kbc revert <id>` | Drop the override; automatic content takes effect |
//! | `kbc conflicts` | List documents flagged for review |
//! | `kbc dismiss <id>` | Remove a conflict flag |
//! | `kbc unknown` | List queries the bot could not answer |
//! | `kbc resolve "<query>"` | Remove an unknown query |
//!
//! ## Examples
//!
//! ```bash
//! # Add a keyword to a scraped document
//! kbc edit 5d1e --op add-keyword --op 'set-keyword:1=yo@0.8'
//!
//! # Go back to the scraped answers
//! kbc revert 5d1e
//! ```

use clap::{Parser, Subcommand};
use kb_curator::{config, edit, get, logging, review, search};
use kb_curator_core::EditOp;
use std::path::PathBuf;

/// KB Curator CLI: review and override a chatbot's scraped answers.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file that selects the document store.
#[derive(Parser)]
#[command(
    name = "kbc",
    about = "KB Curator: review and override a chatbot's scraped answers",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kbc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents scraped from a URL.
    Search {
        /// Source page URL, matched exactly.
        url: String,
    },

    /// Show a document's automatic content, override, and effective answers.
    Get {
        /// Document ID.
        id: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Stage edits on a document's override and save them.
    ///
    /// The working copy starts from the current override, or from the
    /// automatic content when there is none. Operations apply in the order
    /// given. The override is saved only if no keyword contains whitespace.
    Edit {
        /// Document ID.
        id: String,

        /// Edit operation (repeatable): add-text, set-text:I=VALUE,
        /// remove-text:I, add-keyword, set-keyword:I=WORD@CONFIDENCE,
        /// remove-keyword:I.
        #[arg(long = "op", value_parser = edit::parse_edit_op)]
        ops: Vec<EditOp>,

        /// Validate and print the staged override without saving.
        #[arg(long)]
        dry_run: bool,
    },

    /// Save an answer set from a JSON file as a document's override.
    ///
    /// The file holds `{"texts": [...], "keywords": [{"keyword": ..., "confidence": ...}]}`.
    Put {
        /// Document ID.
        id: String,
        /// Path to the answer set JSON file.
        file: PathBuf,
    },

    /// Drop a document's override so its automatic content takes effect.
    Revert {
        /// Document ID.
        id: String,
    },

    /// List documents flagged for manual review.
    Conflicts,

    /// Remove a document's conflict flag without changing its content.
    Dismiss {
        /// Document ID.
        id: String,
    },

    /// List queries the bot could not answer.
    Unknown,

    /// Remove an unknown query by its exact text.
    Resolve {
        /// Query text, matched exactly.
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    logging::init_logging(&cfg.logging.level)?;

    match cli.command {
        Commands::Search { url } => {
            search::run_search(&cfg, &url).await?;
        }
        Commands::Get { id, json } => {
            get::run_get(&cfg, &id, json).await?;
        }
        Commands::Edit { id, ops, dry_run } => {
            edit::run_edit(&cfg, &id, &ops, dry_run).await?;
        }
        Commands::Put { id, file } => {
            edit::run_put(&cfg, &id, &file).await?;
        }
        Commands::Revert { id } => {
            edit::run_revert(&cfg, &id).await?;
        }
        Commands::Conflicts => {
            review::run_conflicts(&cfg).await?;
        }
        Commands::Dismiss { id } => {
            review::run_dismiss(&cfg, &id).await?;
        }
        Commands::Unknown => {
            review::run_unknown(&cfg).await?;
        }
        Commands::Resolve { query } => {
            review::run_resolve(&cfg, &query).await?;
        }
    }

    Ok(())
}
