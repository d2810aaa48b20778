//! # catalog-engine
//!
//! Collaborators for the external indexing engine. The engine owns the index
//! and runs out of process; this crate only drives it: `CommandIndexer` runs
//! the (re)index command to completion, and `EngineClient` fetches documents
//! back, either all of them for a tree build or a filtered set for a search.

pub mod client;
pub mod error;
pub mod indexer;

pub use client::{parse_documents, CommandEngineClient, EngineClient};
pub use error::EngineError;
pub use indexer::CommandIndexer;
