//! Error type for tree addressing.

use thiserror::Error;

/// Errors raised while decoding or validating object identifiers.
#[derive(Error, Debug)]
pub enum TreeError {
    /// Identifier does not follow the encoding scheme
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    /// Identifier parses but points outside the current snapshot
    #[error("object id out of bounds: {0}")]
    OutOfBounds(String),
}
