//! Mapping documents to browse entries, and the container ordering used for
//! all non-playlist listings.

use std::cmp::Ordering;

use catalog_types::{Document, Entry, EntryKind, MediaKind};

/// Build the result entry for a document, or `None` when the mimetype does
/// not belong to the catalog.
pub fn doc_to_entry(id: &str, parent_id: &str, doc: &Document) -> Option<Entry> {
    let kind = match doc.kind() {
        MediaKind::Other => return None,
        MediaKind::Directory => EntryKind::Container,
        _ => EntryKind::Item,
    };

    let mut entry = Entry {
        id: id.to_string(),
        parent_id: parent_id.to_string(),
        title: doc.display_title(),
        kind,
        metadata: Default::default(),
    };

    let tags = &doc.tags;
    let fields: [(&str, Option<&String>); 11] = [
        ("artist", tags.artist.as_ref()),
        ("album", tags.album.as_ref()),
        ("genre", tags.genre.as_ref()),
        ("date", tags.date.as_ref()),
        ("comment", tags.comment.as_ref()),
        ("composer", tags.composer.as_ref()),
        ("disc_number", tags.disc_number.as_ref()),
        ("duration", tags.duration.as_ref()),
        ("bitrate", tags.bitrate.as_ref()),
        ("sample_rate", tags.sample_rate.as_ref()),
        ("size", tags.size.as_ref()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            entry.metadata.insert(key.to_string(), value.clone());
        }
    }
    if entry.meta("artist").is_empty() {
        if let Some(aa) = &tags.album_artist {
            entry.metadata.insert("artist".to_string(), aa.clone());
        }
    }
    // Track numbers sometimes come as "3/12"; keep the track part only.
    if let Some(tn) = &tags.track_number {
        let tn = tn.split('/').next().unwrap_or(tn);
        entry
            .metadata
            .insert("track_number".to_string(), tn.to_string());
    }
    entry
        .metadata
        .insert("mime".to_string(), doc.mimetype.clone());
    entry.metadata.insert("uri".to_string(), doc.url.clone());

    Some(entry)
}

fn dirname(uri: &str) -> &str {
    uri.rsplit_once('/').map(|(d, _)| d).unwrap_or("")
}

fn basename(uri: &str) -> &str {
    uri.rsplit_once('/').map(|(_, b)| b).unwrap_or(uri)
}

fn track_number(entry: &Entry) -> u32 {
    entry.meta("track_number").parse().unwrap_or(0)
}

/// Container sort order: containers before items, containers alphabetically
/// by title, items by album, directory, track number, then file name.
pub fn cmp_entries(a: &Entry, b: &Entry) -> Ordering {
    match (a.is_container(), b.is_container()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (true, true) => return a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        (false, false) => {}
    }
    a.meta("album")
        .cmp(b.meta("album"))
        .then_with(|| dirname(a.meta("uri")).cmp(dirname(b.meta("uri"))))
        .then_with(|| track_number(a).cmp(&track_number(b)))
        .then_with(|| basename(a.meta("uri")).cmp(basename(b.meta("uri"))))
}
