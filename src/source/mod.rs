//! Source media checks and probing.

/// `ffprobe`-based source metadata.
pub mod media;
