//! Browse/search result entries returned to the surrounding service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Container or item flag for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A browsable container (directory, playlist).
    Container,
    /// A playable item.
    Item,
}

/// One entry in a browse or search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Object identifier of this entry.
    pub id: String,
    /// Object identifier of the browsed parent container.
    pub parent_id: String,
    /// Display title.
    pub title: String,
    pub kind: EntryKind,
    /// Tag metadata, keyed by field name (artist, album, uri, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Entry {
    /// Create a bare container entry.
    pub fn container(id: &str, parent_id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            kind: EntryKind::Container,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a bare item entry.
    pub fn item(id: &str, parent_id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            kind: EntryKind::Item,
            metadata: BTreeMap::new(),
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind == EntryKind::Container
    }

    /// Metadata value, empty string when absent. Convenience for ordering.
    pub fn meta(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or("")
    }
}
