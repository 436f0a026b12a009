//! HLS playlists: per-rendition variant playlists and the top-level master playlist.

/// Master playlist synthesis and atomic write.
pub mod master;
/// Variant (media) playlist model, parser and renderer.
pub mod variant;
