//! Media Catalog CLI
//!
//! Exposes a locally indexed media collection as a browsable, searchable
//! catalog tree.
//!
//! # Usage
//!
//! ```bash
//! catalog-daemon index [--rebuild]
//! catalog-daemon browse [OBJID] [--meta] [--offset N] [--count N]
//! catalog-daemon search 'dc:title contains "x"' [--objid OBJID]
//! catalog-daemon status
//! ```
//!
//! # Configuration
//!
//! Loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/media-catalog/config.toml)
//! 3. Environment variables (CATALOG_*)

use anyhow::Result;
use clap::Parser;

use catalog_daemon::{
    handle_browse, handle_index, handle_search, handle_status, init_logging, Cli, Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Index { rebuild } => handle_index(config, rebuild)?,
        Commands::Browse {
            objid,
            meta,
            offset,
            count,
        } => handle_browse(config, objid.as_deref(), meta, offset, count)?,
        Commands::Search { criteria, objid } => {
            handle_search(config, objid.as_deref(), &criteria)?
        }
        Commands::Status => handle_status(config)?,
    }

    Ok(())
}
