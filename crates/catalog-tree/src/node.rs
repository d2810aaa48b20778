//! Directory nodes: named children mapping to (node index, document index).

use std::collections::BTreeMap;

/// Name of the self entry every node carries.
pub const SELF_ENTRY: &str = ".";

/// Name of the parent entry every node carries. The root's parent is itself.
pub const PARENT_ENTRY: &str = "..";

/// Value side of a directory entry: the child's node index when the child is
/// itself a directory, and the index of its document when one exists.
///
/// Purely structural nodes (intermediate path elements, group directories)
/// have no document. Plain leaves have no node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildRef {
    pub node: Option<usize>,
    pub doc: Option<usize>,
}

impl ChildRef {
    /// Reference to a directory node without a document.
    pub fn node(node: usize) -> Self {
        Self {
            node: Some(node),
            doc: None,
        }
    }

    /// Reference to a leaf document.
    pub fn doc(doc: usize) -> Self {
        Self {
            node: None,
            doc: Some(doc),
        }
    }

    /// Reference to a directory node with an associated document.
    pub fn node_doc(node: usize, doc: Option<usize>) -> Self {
        Self {
            node: Some(node),
            doc,
        }
    }
}

/// One directory in the tree: a mapping from child name to [`ChildRef`].
///
/// The root node (index 0) is special: its children are keyed by the absolute
/// paths of the configured content roots, not simple names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    children: BTreeMap<String, ChildRef>,
}

impl DirectoryNode {
    /// Create a node with its structural entries set.
    pub fn new(self_idx: usize, parent_idx: usize, doc: Option<usize>) -> Self {
        let mut node = Self::default();
        node.children
            .insert(SELF_ENTRY.to_string(), ChildRef::node_doc(self_idx, doc));
        node.children
            .insert(PARENT_ENTRY.to_string(), ChildRef::node(parent_idx));
        node
    }

    pub fn get(&self, name: &str) -> Option<ChildRef> {
        self.children.get(name).copied()
    }

    pub fn insert(&mut self, name: &str, child: ChildRef) {
        self.children.insert(name.to_string(), child);
    }

    /// Children excluding the structural `.` and `..` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ChildRef)> {
        self.children
            .iter()
            .filter(|(name, _)| name.as_str() != SELF_ENTRY && name.as_str() != PARENT_ENTRY)
            .map(|(name, child)| (name.as_str(), *child))
    }

    /// Node index of the parent directory.
    pub fn parent(&self) -> usize {
        self.children
            .get(PARENT_ENTRY)
            .and_then(|c| c.node)
            .unwrap_or(0)
    }

    /// Document index attached to this directory, if any.
    pub fn self_doc(&self) -> Option<usize> {
        self.children.get(SELF_ENTRY).and_then(|c| c.doc)
    }

    /// Attach a document to this directory's self entry.
    pub fn set_self_doc(&mut self, doc: usize) {
        if let Some(child) = self.children.get_mut(SELF_ENTRY) {
            child.doc = Some(doc);
        }
    }

    /// Whether the node holds nothing beyond its structural entries.
    pub fn is_empty(&self) -> bool {
        self.children.len() <= 2
    }

    /// Number of children, structural entries included.
    pub fn len(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_entries() {
        let node = DirectoryNode::new(3, 1, Some(7));
        assert_eq!(node.parent(), 1);
        assert_eq!(node.self_doc(), Some(7));
        assert!(node.is_empty());
        assert_eq!(node.entries().count(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut node = DirectoryNode::new(0, 0, None);
        node.insert("track.mp3", ChildRef::doc(4));
        node.insert("sub", ChildRef::node(2));
        assert_eq!(node.get("track.mp3"), Some(ChildRef::doc(4)));
        assert_eq!(node.get("sub").unwrap().node, Some(2));
        assert_eq!(node.entries().count(), 2);
        assert!(!node.is_empty());
    }

    #[test]
    fn test_set_self_doc() {
        let mut node = DirectoryNode::new(2, 0, None);
        assert_eq!(node.self_doc(), None);
        node.set_self_doc(9);
        assert_eq!(node.self_doc(), Some(9));
    }
}
