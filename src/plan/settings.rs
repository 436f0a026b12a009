use std::path::PathBuf;

use crate::foundation::error::{PackError, PackResult};

/// Segment duration used when none is configured.
pub const DEFAULT_SEGMENT_DURATION_SECS: u32 = 6;

/// x264 preset used when none is configured.
pub const DEFAULT_PRESET: &str = "veryfast";

const X264_PRESETS: [&str; 10] = [
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
    "placebo",
];

/// Global settings for one packaging run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PackSettings {
    /// Source media file.
    pub source_path: PathBuf,
    /// Root directory of the output tree.
    pub output_root: PathBuf,
    /// Target segment duration `D` in whole seconds.
    pub segment_duration_secs: u32,
    /// x264 speed/quality preset shared by all renditions.
    pub preset: String,
    /// Remove each rendition directory before encoding so orphans from a failed run cannot survive.
    pub clean_stale_renditions: bool,
}

impl PackSettings {
    /// Settings with default segment duration, preset and stale-output cleanup.
    pub fn new(source_path: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_root: output_root.into(),
            segment_duration_secs: DEFAULT_SEGMENT_DURATION_SECS,
            preset: DEFAULT_PRESET.to_string(),
            clean_stale_renditions: true,
        }
    }

    /// Override the segment duration.
    pub fn with_segment_duration(mut self, secs: u32) -> Self {
        self.segment_duration_secs = secs;
        self
    }

    /// Override the x264 preset.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Check the settings without touching the filesystem.
    pub fn validate(&self) -> PackResult<()> {
        if self.segment_duration_secs == 0 {
            return Err(PackError::invalid_configuration(
                "segment duration must be a positive number of seconds",
            ));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(PackError::invalid_configuration(
                "output root must not be empty",
            ));
        }
        if !X264_PRESETS.contains(&self.preset.as_str()) {
            return Err(PackError::invalid_configuration(format!(
                "unknown x264 preset '{}'",
                self.preset
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/settings.rs"]
mod tests;
