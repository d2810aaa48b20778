//! Playlist resolution: m3u parsing and post-build population of playlist
//! nodes.
//!
//! Runs only after the full tree exists, because entry targets can live
//! anywhere in the collection. Failures are per-playlist and per-entry: a
//! broken playlist file is skipped, a dangling entry is dropped, neither
//! aborts the rebuild.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use catalog_types::Document;

use crate::snapshot::{PlaylistEntry, TreeSnapshot};

/// One meaningful playlist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistLine {
    /// Absolute URL (usually http). Never looked up in the tree.
    Url(String),
    /// Filesystem path, already resolved against the playlist's directory
    /// and lexically normalized.
    Path(PathBuf),
}

fn looks_like_url(line: &str) -> bool {
    match line.find("://") {
        Some(pos) if pos > 0 => line[..pos]
            .chars()
            .all(|c| c.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Lexical normalization: resolves `.` and `..` components without touching
/// the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Parse a line-oriented playlist file. Blank lines and lines starting with
/// `#` are ignored; every other line is an absolute URL or a path relative to
/// the playlist file's own directory.
pub fn parse_playlist(path: &Path) -> std::io::Result<Vec<PlaylistLine>> {
    let bytes = std::fs::read(path)?;
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(&bytes);
    let text = String::from_utf8_lossy(bytes);

    let dir = path.parent().unwrap_or_else(|| Path::new("/"));
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if looks_like_url(line) {
            lines.push(PlaylistLine::Url(line.to_string()));
        } else {
            let p = Path::new(line);
            let resolved = if p.is_absolute() {
                normalize(p)
            } else {
                normalize(&dir.join(p))
            };
            lines.push(PlaylistLine::Path(resolved));
        }
    }
    Ok(lines)
}

enum Resolved {
    Persistent(usize),
    Synthesized(Document),
}

/// Populate every playlist node recorded by the builder.
///
/// Absolute URLs get a transient document appended after the persistent
/// array; relative paths are looked up by exact path and silently dropped
/// when not found. Entry order mirrors file order exactly.
pub fn resolve_playlists(snap: &mut TreeSnapshot) {
    for pl_node in snap.playlist_nodes.clone() {
        let Some(doc_idx) = snap.node(pl_node).and_then(|n| n.self_doc()) else {
            continue;
        };
        let Some(pl_path) = snap.store.get(doc_idx).and_then(|d| d.path()) else {
            continue;
        };
        let lines = match parse_playlist(&pl_path) {
            Ok(lines) => lines,
            Err(err) => {
                warn!(playlist = %pl_path.display(), error = %err, "playlist open failed");
                continue;
            }
        };

        // Resolve against the finished tree first, then append transient
        // documents. Two phases keep the store untouched during lookup.
        let mut resolved: Vec<(String, Resolved)> = Vec::new();
        for line in lines {
            match line {
                PlaylistLine::Url(url) => {
                    let doc = Document::for_url(&url);
                    resolved.push((doc.display_title(), Resolved::Synthesized(doc)));
                }
                PlaylistLine::Path(target) => {
                    let hit = snap
                        .stat_path(&target)
                        .and_then(|c| c.doc)
                        .filter(|&d| snap.store.is_persistent(d));
                    match hit {
                        Some(d) => {
                            let name = target
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default();
                            resolved.push((name, Resolved::Persistent(d)));
                        }
                        None => {
                            debug!(
                                playlist = %pl_path.display(),
                                entry = %target.display(),
                                "no track for playlist entry"
                            );
                        }
                    }
                }
            }
        }

        let mut entries = Vec::with_capacity(resolved.len());
        for (name, res) in resolved {
            let doc = match res {
                Resolved::Persistent(d) => d,
                Resolved::Synthesized(doc) => snap.store.push_transient(doc),
            };
            entries.push(PlaylistEntry { name, doc });
        }
        snap.playlist_entries.insert(pl_node, entries);
    }
}
