//! Document model for indexed media.
//!
//! A [`Document`] is one unit produced by the external indexing engine: a
//! track, a directory, a playlist file, or a transient placeholder
//! synthesized for a playlist URL entry. Documents are immutable once stored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Mimetype string the engine reports for filesystem directories.
pub const DIRECTORY_MIMETYPE: &str = "inode/directory";

/// Mimetype string the engine reports for m3u playlist files.
pub const PLAYLIST_MIMETYPE: &str = "audio/x-mpegurl";

/// Media mimetypes that participate in the catalog tree. Anything else the
/// engine happens to have indexed (text files, images) is ignored.
const MEDIA_MIMETYPES: &[&str] = &[
    "audio/mpeg",
    "audio/flac",
    "application/flac",
    "audio/x-flac",
    "application/x-flac",
    "application/ogg",
    "audio/aac",
    "audio/mp4",
    "video/mp4",
    "audio/x-aiff",
    "audio/x-musepack",
    "audio/ape",
    "audio/x-wav",
    "audio/x-wavpack",
    DIRECTORY_MIMETYPE,
    PLAYLIST_MIMETYPE,
];

/// Closed classification of a document's mimetype, used for dispatch when
/// placing leaves in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// A filesystem directory.
    Directory,
    /// A playlist file, resolved into an ordered entry list post hoc.
    Playlist,
    /// A playable media file.
    Track,
    /// Indexed but not part of the media catalog.
    Other,
}

impl MediaKind {
    /// Classify a mimetype string.
    pub fn from_mimetype(mimetype: &str) -> Self {
        match mimetype {
            DIRECTORY_MIMETYPE => MediaKind::Directory,
            PLAYLIST_MIMETYPE => MediaKind::Playlist,
            m if MEDIA_MIMETYPES.contains(&m) => MediaKind::Track,
            _ => MediaKind::Other,
        }
    }

    /// Whether this kind participates in the catalog at all.
    pub fn is_media(self) -> bool {
        self != MediaKind::Other
    }
}

/// Common tag fields extracted at indexing time.
///
/// Fixed schema with optional fields for the common set; anything rarer goes
/// into [`Document::extra`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    /// Grouping tag (e.g. disc of a multi-disc set). Inserts a virtual path
    /// segment in the folders tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// One indexed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Location: `file://` URL for local files, any other scheme for
    /// synthesized playlist entries.
    pub url: String,
    /// Mimetype as reported by the engine.
    pub mimetype: String,
    /// Common tag fields.
    #[serde(default)]
    pub tags: TagSet,
    /// Rarely used custom tags, keyed by engine field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Document {
    /// Create a document for a local file.
    pub fn local(path: &str, mimetype: &str) -> Self {
        Self {
            url: format!("file://{path}"),
            mimetype: mimetype.to_string(),
            ..Default::default()
        }
    }

    /// Classification of the document's mimetype.
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mimetype(&self.mimetype)
    }

    /// Filesystem path for a `file://` URL, `None` for other schemes.
    pub fn path(&self) -> Option<PathBuf> {
        self.url
            .strip_prefix("file://")
            .map(|p| PathBuf::from(p.trim_end_matches('/')))
    }

    /// Last path or URL component, used when no title tag is available.
    pub fn file_name(&self) -> String {
        let trimmed = self.url.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some((_, name)) => name.to_string(),
            None => trimmed.to_string(),
        }
    }

    /// Display title: the title tag, falling back to the file name.
    pub fn display_title(&self) -> String {
        self.tags
            .title
            .clone()
            .unwrap_or_else(|| self.file_name())
    }

    /// Synthesize a transient document for an absolute URL found in a
    /// playlist. Best-effort title from the last URL component.
    pub fn for_url(url: &str) -> Self {
        let mut doc = Self {
            url: url.to_string(),
            mimetype: "audio/mpeg".to_string(),
            ..Default::default()
        };
        doc.tags.title = Some(doc.file_name());
        doc
    }

    /// Containing directory path for a local document; the path itself when
    /// the document is a directory.
    pub fn folder(&self) -> Option<PathBuf> {
        let path = self.path()?;
        if self.kind() == MediaKind::Directory {
            Some(path)
        } else {
            path.parent().map(Path::to_path_buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_classification() {
        assert_eq!(
            MediaKind::from_mimetype("inode/directory"),
            MediaKind::Directory
        );
        assert_eq!(
            MediaKind::from_mimetype("audio/x-mpegurl"),
            MediaKind::Playlist
        );
        assert_eq!(MediaKind::from_mimetype("audio/flac"), MediaKind::Track);
        assert_eq!(MediaKind::from_mimetype("text/plain"), MediaKind::Other);
        assert!(!MediaKind::Other.is_media());
        assert!(MediaKind::Playlist.is_media());
    }

    #[test]
    fn test_local_path() {
        let doc = Document::local("/music/a/b.flac", "audio/flac");
        assert_eq!(doc.path(), Some(PathBuf::from("/music/a/b.flac")));
        assert_eq!(doc.file_name(), "b.flac");
    }

    #[test]
    fn test_path_none_for_remote() {
        let doc = Document::for_url("http://radio.example.com/stream.mp3");
        assert_eq!(doc.path(), None);
        assert_eq!(doc.tags.title.as_deref(), Some("stream.mp3"));
    }

    #[test]
    fn test_display_title_fallback() {
        let mut doc = Document::local("/music/track.mp3", "audio/mpeg");
        assert_eq!(doc.display_title(), "track.mp3");
        doc.tags.title = Some("A Song".to_string());
        assert_eq!(doc.display_title(), "A Song");
    }

    #[test]
    fn test_folder_for_track_and_directory() {
        let track = Document::local("/music/album/track.mp3", "audio/mpeg");
        assert_eq!(track.folder(), Some(PathBuf::from("/music/album")));
        let dir = Document::local("/music/album", "inode/directory");
        assert_eq!(dir.folder(), Some(PathBuf::from("/music/album")));
    }
}
