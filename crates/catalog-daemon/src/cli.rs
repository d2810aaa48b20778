//! CLI argument parsing for the catalog daemon.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Media Catalog
///
/// Browse and search a locally indexed media collection.
#[derive(Parser, Debug)]
#[command(name = "catalog-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides the default platform config path)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the index pipeline and rebuild the catalog tree
    Index {
        /// Reindex from scratch instead of incrementally
        #[arg(long)]
        rebuild: bool,
    },

    /// List a container's children
    Browse {
        /// Object identifier (defaults to the tree root)
        objid: Option<String>,

        /// Describe the object itself instead of listing children
        #[arg(long)]
        meta: bool,

        /// Skip this many entries
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Return at most this many entries (0 = all)
        #[arg(long, default_value = "0")]
        count: usize,
    },

    /// Search the collection
    Search {
        /// Query in the protocol search syntax
        criteria: String,

        /// Container to scope the search to (defaults to the tree root)
        #[arg(short, long)]
        objid: Option<String>,
    },

    /// Build a tree from the current index and report its health
    Status,
}
