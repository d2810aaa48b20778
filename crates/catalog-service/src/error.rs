//! Error types for the service facade.
//!
//! Only structural, caller-triggered problems surface as errors. Engine
//! failures at query time and untranslatable queries degrade to empty
//! results inside the facade.

use catalog_search::SearchError;
use catalog_tree::TreeError;
use thiserror::Error;

/// Errors returned to the caller of browse/search.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or out-of-bounds object identifier
    #[error("object identifier error: {0}")]
    Tree(#[from] TreeError),

    /// Caller misuse of the search language
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// A children listing was requested on a non-container identifier
    #[error("not a container: {0}")]
    NotContainer(String),
}
