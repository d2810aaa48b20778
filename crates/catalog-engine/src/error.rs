//! Error types for the engine collaborators.

use thiserror::Error;

/// Errors from the out-of-process engine commands.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configured command could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The index command completed with a failure status
    #[error("indexer failed: {0}")]
    Indexer(String),

    /// The query command completed with a failure status
    #[error("engine query failed: {0}")]
    Query(String),

    /// The engine adapter is not usable as configured
    #[error("engine configuration error: {0}")]
    Config(String),
}
