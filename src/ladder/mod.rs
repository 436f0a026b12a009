//! Bitrate ladder: the ordered table of renditions offered to players.

/// Rendition specs and the validated [`rendition::Ladder`] table.
pub mod rendition;
