//! Field-alias table: protocol field names to engine field names.
//!
//! Unmapped names pass through verbatim; the engine ignores field
//! specifications it does not know.

/// Protocol name -> engine name. Creator-style synonyms fold into the same
/// engine field.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("upnp:class", "mime"),
    ("dc:title", "title"),
    ("tt", "title"),
    ("upnp:artist", "artist"),
    ("dc:creator", "artist"),
    ("upnp:album", "album"),
    ("upnp:genre", "genre"),
    ("dc:date", "date"),
    ("dc:description", "comment"),
    ("upnp:originalTrackNumber", "tracknumber"),
    ("res:mime", "mime"),
    ("res:bitrate", "bitrate"),
    ("res:size", "fbytes"),
];

/// Map a protocol field name to the engine's name for it. The lookup is
/// case-insensitive; unknown names are returned unchanged (lowercased, since
/// query keywords already are).
pub fn engine_field(protocol_name: &str) -> String {
    for (proto, engine) in FIELD_ALIASES {
        if proto.eq_ignore_ascii_case(protocol_name) {
            return (*engine).to_string();
        }
    }
    protocol_name.to_string()
}
