//! Object identifiers: the externally visible addressing of tree positions.
//!
//! Scheme: `<root-prefix>$<tree-name>$<marker><nodeIndex>[$e<entryIndex>]`
//! with marker `d` for container nodes and `i` for item documents. The bare
//! `<root-prefix><tree-name>` form addresses the tree root.
//!
//! Encoding and decoding are pure transforms; they do not check that the
//! referenced node still exists after a rebuild. [`AddressCodec::validate`]
//! bounds-checks an id against one snapshot.

use crate::error::TreeError;
use crate::snapshot::TreeSnapshot;

/// Addressed position: a directory node or an item document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAddr {
    Container(usize),
    Item(usize),
}

/// Decoded object identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectId {
    /// Tree name (e.g. `folders`).
    pub tree: String,
    pub addr: NodeAddr,
    /// Entry index within a playlist container.
    pub entry: Option<usize>,
}

impl ObjectId {
    pub fn container(tree: &str, node: usize) -> Self {
        Self {
            tree: tree.to_string(),
            addr: NodeAddr::Container(node),
            entry: None,
        }
    }

    pub fn item(tree: &str, doc: usize) -> Self {
        Self {
            tree: tree.to_string(),
            addr: NodeAddr::Item(doc),
            entry: None,
        }
    }

    pub fn with_entry(mut self, entry: usize) -> Self {
        self.entry = Some(entry);
        self
    }
}

/// Bidirectional mapping between identifier strings and tree positions.
///
/// The root prefix is fixed per deployment and must match what the
/// surrounding dispatch layer uses.
#[derive(Debug, Clone)]
pub struct AddressCodec {
    root_prefix: String,
}

impl AddressCodec {
    /// Create a codec with the deployment's identifier prefix, e.g.
    /// `0$catalog$`.
    pub fn new(root_prefix: &str) -> Self {
        Self {
            root_prefix: root_prefix.to_string(),
        }
    }

    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Identifier of a tree's root container.
    pub fn tree_root(&self, tree: &str) -> String {
        format!("{}{}", self.root_prefix, tree)
    }

    pub fn encode(&self, id: &ObjectId) -> String {
        let mut out = match id.addr {
            NodeAddr::Container(0) if id.entry.is_none() => {
                return self.tree_root(&id.tree);
            }
            NodeAddr::Container(n) => format!("{}{}$d{}", self.root_prefix, id.tree, n),
            NodeAddr::Item(n) => format!("{}{}$i{}", self.root_prefix, id.tree, n),
        };
        if let Some(entry) = id.entry {
            out.push_str(&format!("$e{entry}"));
        }
        out
    }

    pub fn decode(&self, objid: &str) -> Result<ObjectId, TreeError> {
        let rest = objid.strip_prefix(&self.root_prefix).ok_or_else(|| {
            TreeError::InvalidObjectId(format!(
                "[{objid}] does not start with [{}]",
                self.root_prefix
            ))
        })?;

        let mut parts = rest.split('$');
        let tree = parts
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TreeError::InvalidObjectId(format!("[{objid}] has no tree name")))?;

        let addr = match parts.next() {
            None => NodeAddr::Container(0),
            Some(marked) => {
                // Identifiers are external input; the marker may be any
                // character, multibyte included.
                let marker = marked.chars().next().ok_or_else(|| {
                    TreeError::InvalidObjectId(format!("[{objid}] has empty node component"))
                })?;
                let digits = &marked[marker.len_utf8()..];
                match marker {
                    'd' => NodeAddr::Container(parse_index(objid, digits)?),
                    'i' => NodeAddr::Item(parse_index(objid, digits)?),
                    _ => {
                        return Err(TreeError::InvalidObjectId(format!(
                            "[{objid}] has unknown node marker [{marker}]"
                        )))
                    }
                }
            }
        };

        let entry = match parts.next() {
            None => None,
            Some(marked) => {
                let digits = marked.strip_prefix('e').ok_or_else(|| {
                    TreeError::InvalidObjectId(format!("[{objid}] has malformed entry suffix"))
                })?;
                Some(parse_index(objid, digits)?)
            }
        };

        if parts.next().is_some() {
            return Err(TreeError::InvalidObjectId(format!(
                "[{objid}] has trailing components"
            )));
        }

        Ok(ObjectId {
            tree: tree.to_string(),
            addr,
            entry,
        })
    }

    /// Check a decoded identifier against the current snapshot's bounds.
    pub fn validate(&self, id: &ObjectId, snap: &TreeSnapshot) -> Result<(), TreeError> {
        match id.addr {
            NodeAddr::Container(n) if n >= snap.node_count() => {
                return Err(TreeError::OutOfBounds(format!(
                    "node {n} exceeds tree size {}",
                    snap.node_count()
                )));
            }
            NodeAddr::Item(n) if n >= snap.store().len() => {
                return Err(TreeError::OutOfBounds(format!(
                    "doc {n} exceeds document count {}",
                    snap.store().len()
                )));
            }
            _ => {}
        }
        if let (Some(entry), NodeAddr::Container(n)) = (id.entry, id.addr) {
            let len = snap.playlist_entries(n).map(<[_]>::len).unwrap_or(0);
            if entry >= len {
                return Err(TreeError::OutOfBounds(format!(
                    "entry {entry} exceeds playlist length {len}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_index(objid: &str, digits: &str) -> Result<usize, TreeError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TreeError::InvalidObjectId(format!(
            "[{objid}] has non-numeric index [{digits}]"
        )));
    }
    digits
        .parse()
        .map_err(|_| TreeError::InvalidObjectId(format!("[{objid}] index out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> AddressCodec {
        AddressCodec::new("0$catalog$")
    }

    #[test]
    fn test_roundtrip_container() {
        let codec = codec();
        let id = ObjectId::container("folders", 42);
        let s = codec.encode(&id);
        assert_eq!(s, "0$catalog$folders$d42");
        assert_eq!(codec.decode(&s).unwrap(), id);
    }

    #[test]
    fn test_roundtrip_item() {
        let codec = codec();
        let id = ObjectId::item("folders", 7);
        assert_eq!(codec.decode(&codec.encode(&id)).unwrap(), id);
    }

    #[test]
    fn test_roundtrip_entry() {
        let codec = codec();
        let id = ObjectId::container("folders", 3).with_entry(12);
        let s = codec.encode(&id);
        assert_eq!(s, "0$catalog$folders$d3$e12");
        assert_eq!(codec.decode(&s).unwrap(), id);
    }

    #[test]
    fn test_bare_tree_is_root() {
        let codec = codec();
        let id = codec.decode("0$catalog$folders").unwrap();
        assert_eq!(id.addr, NodeAddr::Container(0));
        assert_eq!(id.entry, None);
        assert_eq!(codec.encode(&id), "0$catalog$folders");
    }

    #[test]
    fn test_decode_rejects_wrong_prefix() {
        assert!(matches!(
            codec().decode("1$other$folders$d1"),
            Err(TreeError::InvalidObjectId(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_marker() {
        assert!(codec().decode("0$catalog$folders$x3").is_err());
        assert!(codec().decode("0$catalog$folders$").is_err());
    }

    #[test]
    fn test_decode_rejects_multibyte_marker() {
        assert!(matches!(
            codec().decode("0$catalog$folders$é3"),
            Err(TreeError::InvalidObjectId(_))
        ));
        assert!(codec().decode("0$catalog$folders$日42").is_err());
    }

    #[test]
    fn test_decode_rejects_non_numeric_index() {
        assert!(codec().decode("0$catalog$folders$dxyz").is_err());
        assert!(codec().decode("0$catalog$folders$d-1").is_err());
        assert!(codec().decode("0$catalog$folders$d").is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_garbage() {
        assert!(codec().decode("0$catalog$folders$d1$e2$junk").is_err());
        assert!(codec().decode("0$catalog$folders$d1$f2").is_err());
    }

    #[test]
    fn test_validate_bounds() {
        use crate::builder::TreeBuilder;
        use catalog_types::{Document, DocumentStore};
        use std::path::PathBuf;

        let snap = TreeBuilder::new(vec![PathBuf::from("/m")]).build(DocumentStore::new(vec![
            Document::local("/m/t.mp3", "audio/mpeg"),
        ]));
        let codec = codec();
        assert!(codec
            .validate(&ObjectId::container("folders", 1), &snap)
            .is_ok());
        assert!(codec
            .validate(&ObjectId::container("folders", 99), &snap)
            .is_err());
        assert!(codec.validate(&ObjectId::item("folders", 0), &snap).is_ok());
        assert!(codec
            .validate(&ObjectId::item("folders", 5), &snap)
            .is_err());
        assert!(codec
            .validate(&ObjectId::container("folders", 1).with_entry(0), &snap)
            .is_err());
    }
}
