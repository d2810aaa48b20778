//! Tree construction: one pass over the document collection, splitting each
//! document's path under its content root and creating directory nodes on
//! demand.

use std::path::PathBuf;

use tracing::{debug, info};

use catalog_types::{DocumentStore, MediaKind};

use crate::node::{ChildRef, DirectoryNode};
use crate::snapshot::TreeSnapshot;
use crate::tags::TagTree;

/// Builds a [`TreeSnapshot`] from a [`DocumentStore`].
pub struct TreeBuilder {
    roots: Vec<PathBuf>,
}

impl TreeBuilder {
    /// Create a builder for the given content roots, in registration order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Walk the document collection, in engine iteration order, and build the
    /// folders structure. Playlist nodes are recorded but left empty; run
    /// [`crate::resolve_playlists`] on the result before publishing.
    pub fn build(self, store: DocumentStore) -> TreeSnapshot {
        let mut snap = TreeSnapshot::default();

        // Root node. Its children are the content roots, keyed by absolute
        // path rather than a simple name.
        snap.nodes.push(DirectoryNode::new(0, 0, None));
        for root in &self.roots {
            let key = root.to_string_lossy().trim_end_matches('/').to_string();
            let idx = snap.nodes.len();
            snap.nodes.push(DirectoryNode::new(idx, 0, None));
            snap.nodes[0].insert(&key, ChildRef::node(idx));
            snap.roots.push((key, idx));
        }

        for (doc_idx, doc) in store.iter_persistent() {
            let kind = doc.kind();
            if kind == MediaKind::Other {
                continue;
            }
            let Some((mut at, segments)) = snap.split_doc_path(doc) else {
                // Common for synthetic documents with no filesystem presence.
                continue;
            };

            let last = segments.len() - 1;
            for (i, segment) in segments.iter().enumerate() {
                match snap.nodes[at].get(segment) {
                    Some(existing) => {
                        // Path element already seen. On the final segment,
                        // attach the document to the existing entry
                        // (intermediate elements were created doc-less).
                        if i == last {
                            snap.nodes[at].insert(
                                segment,
                                ChildRef {
                                    node: existing.node,
                                    doc: Some(doc_idx),
                                },
                            );
                            if let Some(n) = existing.node {
                                snap.nodes[n].set_self_doc(doc_idx);
                            }
                        }
                        match existing.node {
                            Some(n) => at = n,
                            None if i != last => {
                                // A plain leaf was created here earlier but
                                // the path continues below it: promote it to
                                // a directory, keeping its document.
                                at = create_dir(&mut snap, at, existing.doc, segment);
                            }
                            None => {}
                        }
                    }
                    None if i != last => {
                        // Intermediate element: doc-less directory.
                        at = create_dir(&mut snap, at, None, segment);
                    }
                    None => match kind {
                        MediaKind::Directory => {
                            at = create_dir(&mut snap, at, Some(doc_idx), segment);
                        }
                        MediaKind::Playlist => {
                            at = create_dir(&mut snap, at, Some(doc_idx), segment);
                            snap.playlist_nodes.push(at);
                        }
                        _ => {
                            snap.nodes[at].insert(segment, ChildRef::doc(doc_idx));
                        }
                    },
                }
            }
        }

        debug!(
            nodes = snap.nodes.len(),
            playlists = snap.playlist_nodes.len(),
            "folders tree built"
        );
        info!(
            docs = store.persistent_len(),
            nodes = snap.nodes.len(),
            "tree build complete"
        );
        snap.tags = TagTree::build(&store);
        snap.store = store;
        snap
    }
}

/// Append a directory node and link it into its father.
fn create_dir(snap: &mut TreeSnapshot, parent: usize, doc: Option<usize>, name: &str) -> usize {
    let idx = snap.nodes.len();
    snap.nodes.push(DirectoryNode::new(idx, parent, doc));
    snap.nodes[parent].insert(name, ChildRef::node_doc(idx, doc));
    idx
}
