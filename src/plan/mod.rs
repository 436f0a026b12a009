//! Encode planning: settings, letterbox geometry and per-rendition jobs.

/// Letterbox/pillarbox fitting of the source into a ladder box.
pub mod geometry;
/// H.264 level 4.0 limits the ladder is encoded under.
pub mod level;
/// Ladder + settings -> concrete encode jobs.
pub mod planner;
/// Validated pipeline settings.
pub mod settings;
