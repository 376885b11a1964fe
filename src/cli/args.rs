//! CLI argument definitions using clap
//!
//! Commands:
//! - dailylog init --config <path>
//! - dailylog create --config <path>          (draft JSON on stdin)
//! - dailylog list --config <path> [--query <text>]
//! - dailylog show <id> --config <path> [--full]
//! - dailylog edit <id> --config <path>       (draft JSON on stdin)
//! - dailylog delete <id> --config <path>
//! - dailylog attach <id> <files>... --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dailylog - a local store for daily status updates
#[derive(Parser, Debug)]
#[command(name = "dailylog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty collection
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,
    },

    /// Create a record from a draft read on stdin
    Create {
        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,
    },

    /// List records, optionally filtered by title
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,

        /// Case-insensitive title filter
        #[arg(long, short, default_value = "")]
        query: String,
    },

    /// Show one record
    Show {
        /// Record id
        id: String,

        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,

        /// Print the stored record including encoded images
        #[arg(long)]
        full: bool,
    },

    /// Replace a record with a draft read on stdin
    Edit {
        /// Record id
        id: String,

        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,
    },

    /// Delete a record (missing ids are not an error)
    Delete {
        /// Record id
        id: String,

        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,
    },

    /// Attach image files to a record
    Attach {
        /// Record id
        id: String,

        /// Files to attach, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to configuration file
        #[arg(long, default_value = "./dailylog.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
