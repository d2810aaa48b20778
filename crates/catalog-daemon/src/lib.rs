//! Catalog daemon library exports.
//!
//! - `cli`: command-line argument parsing with clap
//! - `commands`: command implementations (index, browse, search, status)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{handle_browse, handle_index, handle_search, handle_status, init_logging};
