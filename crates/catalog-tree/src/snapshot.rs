//! The immutable tree built over one document collection.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use catalog_types::{Document, DocumentStore};

use crate::node::{ChildRef, DirectoryNode};
use crate::tags::TagTree;

/// One resolved playlist entry, in playlist file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Display name (file name or synthesized title).
    pub name: String,
    /// Document index in the snapshot's store.
    pub doc: usize,
}

/// Fully built directory structure over a document collection.
///
/// Node 0 is the root; its children are keyed by the absolute paths of the
/// configured content roots. Published snapshots are never mutated, the
/// builder and the playlist resolver are the only writers and both run before
/// publication.
#[derive(Debug, Default)]
pub struct TreeSnapshot {
    pub(crate) nodes: Vec<DirectoryNode>,
    /// Content roots in registration order: (absolute path, node index).
    pub(crate) roots: Vec<(String, usize)>,
    /// Nodes created for playlist files, resolved after the build.
    pub(crate) playlist_nodes: Vec<usize>,
    /// Resolved playlist content, keyed by playlist node index.
    pub(crate) playlist_entries: HashMap<usize, Vec<PlaylistEntry>>,
    /// Tag hierarchy over the same store, addressed as its own tree.
    pub(crate) tags: TagTree,
    pub(crate) store: DocumentStore,
}

impl TreeSnapshot {
    pub fn node(&self, idx: usize) -> Option<&DirectoryNode> {
        self.nodes.get(idx)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn tags(&self) -> &TagTree {
        &self.tags
    }

    /// Content roots in registration order.
    pub fn roots(&self) -> &[(String, usize)] {
        &self.roots
    }

    /// Node indices recorded as playlist directories.
    pub fn playlist_nodes(&self) -> &[usize] {
        &self.playlist_nodes
    }

    pub fn is_playlist(&self, idx: usize) -> bool {
        self.playlist_nodes.contains(&idx)
    }

    /// Resolved entries for a playlist node, in file order.
    pub fn playlist_entries(&self, idx: usize) -> Option<&[PlaylistEntry]> {
        self.playlist_entries.get(&idx).map(Vec::as_slice)
    }

    /// Find the content root owning `path` (first prefix match in
    /// registration order) and the remaining path components.
    ///
    /// Returns `None` when no root matches (common for synthetic documents
    /// with non-file URLs) or when the path is a root itself.
    fn segments_after_root(&self, path: &str) -> Option<(usize, Vec<String>)> {
        let (root_path, root_node) = self
            .roots
            .iter()
            .find(|(root_path, _)| path.starts_with(root_path.as_str()))?;
        let rest = &path[root_path.len()..];
        if rest.is_empty() {
            return None;
        }
        let segments: Vec<String> = rest
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some((*root_node, segments))
    }

    /// Compute the starting node and path segments for a document, inserting
    /// the group tag as a virtual segment before the final component.
    pub fn split_doc_path(&self, doc: &Document) -> Option<(usize, Vec<String>)> {
        let path = doc.path()?;
        let (start, mut segments) = self.segments_after_root(&path.to_string_lossy())?;
        if let Some(group) = doc.tags.group.as_deref() {
            if !group.is_empty() && !segments.is_empty() {
                segments.insert(segments.len() - 1, group.to_string());
            }
        }
        Some((start, segments))
    }

    fn walk(&self, start: usize, segments: &[String]) -> Option<ChildRef> {
        let mut at = ChildRef::node(start);
        for segment in segments {
            let node = self.nodes.get(at.node?)?;
            at = node.get(segment)?;
        }
        Some(at)
    }

    /// Look up a filesystem path by exact match in the built tree.
    ///
    /// Group virtual segments are not considered, the lookup follows the real
    /// path only.
    pub fn stat_path(&self, path: &Path) -> Option<ChildRef> {
        let (start, segments) = self.segments_after_root(&path.to_string_lossy())?;
        self.walk(start, &segments)
    }

    /// Locate a document's entry by walking its derived path, group segment
    /// included.
    pub fn locate_doc(&self, doc: &Document) -> Option<ChildRef> {
        let (start, segments) = self.split_doc_path(doc)?;
        self.walk(start, &segments)
    }

    /// Node index of the directory containing a document's entry, group
    /// segment included. `None` for documents outside the tree (synthesized
    /// playlist entries).
    pub fn parent_of_doc(&self, doc: &Document) -> Option<usize> {
        let (start, segments) = self.split_doc_path(doc)?;
        match segments.len() {
            0 => Some(start),
            n => self.walk(start, &segments[..n - 1]).and_then(|c| c.node),
        }
    }

    /// Rebuild the filesystem-relative path of a container node by walking
    /// the `..` links. This is pwd: used to scope searches to the browsed
    /// container.
    pub fn dir_path(&self, mut idx: usize) -> String {
        if idx == 0 {
            return "/".to_string();
        }
        let mut parts: Vec<&str> = Vec::new();
        loop {
            let Some(node) = self.nodes.get(idx) else {
                return "/".to_string();
            };
            let father_idx = node.parent();
            let Some(father) = self.nodes.get(father_idx) else {
                return "/".to_string();
            };
            let Some((name, _)) = father.entries().find(|(_, c)| c.node == Some(idx)) else {
                warn!(node = idx, "dir_path: father link not found, returning /");
                return "/".to_string();
            };
            parts.push(name);
            if parts.len() > 200 {
                warn!(node = idx, "dir_path: looping, returning /");
                return "/".to_string();
            }
            idx = father_idx;
            if idx == 0 {
                break;
            }
        }
        let mut path = String::new();
        for part in parts.iter().rev() {
            path.push_str(part);
            path.push('/');
        }
        path
    }
}
