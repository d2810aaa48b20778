//! Tag hierarchy: fixed categories over the tag values of the indexed
//! tracks, browsed as its own tree beside the folders tree.
//!
//! Two levels: category containers (Albums, Artists, Genres) whose children
//! are one container per distinct tag value, holding the tracks carrying
//! that value. Built from the same document store as the folders tree, so
//! item positions are store indices either way.

use std::collections::BTreeMap;

use catalog_types::{DocumentStore, MediaKind, TagSet};

fn album_tag(tags: &TagSet) -> Option<&str> {
    tags.album.as_deref()
}

// Artist grouping prefers the album artist when one is set.
fn artist_tag(tags: &TagSet) -> Option<&str> {
    tags.album_artist.as_deref().or(tags.artist.as_deref())
}

fn genre_tag(tags: &TagSet) -> Option<&str> {
    tags.genre.as_deref()
}

/// Root categories of the tag tree, with the tag each groups by.
const CATEGORIES: &[(&str, fn(&TagSet) -> Option<&str>)] = &[
    ("Albums", album_tag),
    ("Artists", artist_tag),
    ("Genres", genre_tag),
];

/// One node of the tag tree: the root, a category, or a tag value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagNode {
    pub title: String,
    /// Child node indices. Value nodes have none.
    pub children: Vec<usize>,
    /// Track document indices under a value node, in store order.
    pub docs: Vec<usize>,
}

/// The tags browse tree. Node 0 is the root; its children are the fixed
/// categories, each category's children one node per distinct value.
#[derive(Debug, Default)]
pub struct TagTree {
    nodes: Vec<TagNode>,
}

impl TagTree {
    /// Build the hierarchy from the persistent tracks of a store.
    pub fn build(store: &DocumentStore) -> Self {
        let mut tree = TagTree {
            nodes: vec![TagNode::default()],
        };
        for (title, tag) in CATEGORIES {
            let mut values: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (doc_idx, doc) in store.iter_persistent() {
                if doc.kind() != MediaKind::Track {
                    continue;
                }
                if let Some(value) = tag(&doc.tags) {
                    if !value.is_empty() {
                        values.entry(value.to_string()).or_default().push(doc_idx);
                    }
                }
            }

            let category = tree.nodes.len();
            tree.nodes.push(TagNode {
                title: (*title).to_string(),
                ..Default::default()
            });
            tree.nodes[0].children.push(category);
            for (value, docs) in values {
                let idx = tree.nodes.len();
                tree.nodes.push(TagNode {
                    title: value,
                    children: Vec::new(),
                    docs,
                });
                tree.nodes[category].children.push(idx);
            }
        }
        tree
    }

    pub fn node(&self, idx: usize) -> Option<&TagNode> {
        self.nodes.get(idx)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the node listing `idx` among its children.
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.nodes.iter().position(|n| n.children.contains(&idx))
    }
}
