/// Comment marker written by engines for opening-book moves.
pub const BOOK_MARKER: &str = "book";

/// Marker of a mate-distance score such as `+M7/31`. Matched anywhere in the
/// comment, so any capital M excludes the ply.
pub const MATE_MARKER: &str = "M";

/// Whether a ply with this annotation belongs in the tuning set.
pub fn is_included(annotation: &str) -> bool {
    !(annotation.contains(BOOK_MARKER) || annotation.contains(MATE_MARKER))
}
