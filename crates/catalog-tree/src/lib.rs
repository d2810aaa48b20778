//! # catalog-tree
//!
//! The in-memory folders tree over one indexed document collection.
//!
//! A [`TreeBuilder`] consumes the engine's flat document list and produces a
//! [`TreeSnapshot`]: directory nodes created by splitting document paths under
//! the configured content roots, with playlist files recorded for deferred
//! resolution. [`resolve_playlists`] then populates playlist nodes from their
//! m3u files, once the whole tree exists and targets can be looked up by
//! path. [`AddressCodec`] maps tree positions to externally visible object
//! identifier strings.
//!
//! A published snapshot is immutable; a rebuild always produces a brand-new
//! one.

pub mod builder;
pub mod entries;
pub mod error;
pub mod node;
pub mod objid;
pub mod playlist;
pub mod snapshot;
pub mod tags;

pub use builder::TreeBuilder;
pub use entries::{cmp_entries, doc_to_entry};
pub use error::TreeError;
pub use node::{ChildRef, DirectoryNode, PARENT_ENTRY, SELF_ENTRY};
pub use objid::{AddressCodec, NodeAddr, ObjectId};
pub use playlist::{parse_playlist, resolve_playlists, PlaylistLine};
pub use snapshot::{PlaylistEntry, TreeSnapshot};
pub use tags::{TagNode, TagTree};
