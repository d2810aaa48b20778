//! # catalog-service
//!
//! The service layer of the media catalog: the rebuild coordinator that owns
//! the published tree and the state machine around reindexing, and the
//! browse/search facade serving requests against the current snapshot.

pub mod coordinator;
pub mod error;
pub mod service;

pub use coordinator::{IndexState, RebuildCoordinator, Status};
pub use error::ServiceError;
pub use service::{BrowseFlag, CatalogService, FOLDERS_TREE, TAGS_TREE};
