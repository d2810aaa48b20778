//! Error type for query translation.

use thiserror::Error;

/// Errors raised by the search translator.
///
/// Only caller misuse is an error; data-quality problems degrade to an empty
/// translation instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// The match-everything wildcard was combined with other query content
    #[error("if the wildcard is used it must be the only input: {0}")]
    WildcardMisuse(String),
}
