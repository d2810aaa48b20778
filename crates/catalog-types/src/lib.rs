//! # catalog-types
//!
//! Shared types for the media catalog: the document model produced by the
//! external indexing engine, the immutable per-cycle document store, browse
//! entries returned to the surrounding service, configuration and errors.

pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod store;

pub use config::{CatalogConfig, EngineSettings, IndexerSettings};
pub use document::{Document, MediaKind, TagSet};
pub use entry::{Entry, EntryKind};
pub use error::CatalogError;
pub use store::DocumentStore;
