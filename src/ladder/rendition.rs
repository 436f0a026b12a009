use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::foundation::error::{PackError, PackResult};
use crate::plan::level;
use crate::plan::planner::VIDEO_LEVEL;

/// One ladder entry: the geometry and rate targets of a single rendition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenditionSpec {
    /// Rendition name; also the name of its output directory.
    pub name: String,
    /// Output width in pixels (exact, after padding).
    pub width: u32,
    /// Output height in pixels (exact, after padding).
    pub height: u32,
    /// Target video bitrate in bits per second.
    pub video_bitrate_bps: u64,
    /// Peak video bitrate in bits per second (VBV max rate).
    pub video_max_bitrate_bps: u64,
    /// VBV buffer size in bytes.
    pub video_buffer_size_bytes: u64,
    /// x264 constant rate factor.
    pub quality_param: u8,
    /// Target audio bitrate in bits per second.
    pub audio_bitrate_bps: u64,
    /// Audio output sample rate in Hz.
    #[serde(default = "default_audio_sample_rate_hz")]
    pub audio_sample_rate_hz: u32,
}

fn default_audio_sample_rate_hz() -> u32 {
    48_000
}

impl RenditionSpec {
    /// Advertised bandwidth: video target plus audio target, in bits per second.
    pub fn bandwidth_bps(&self) -> u64 {
        self.video_bitrate_bps.saturating_add(self.audio_bitrate_bps)
    }

    /// VBV buffer size in bits, as the encoder takes it.
    pub fn video_buffer_size_bits(&self) -> u64 {
        self.video_buffer_size_bytes.saturating_mul(8)
    }

    /// `WIDTHxHEIGHT`, as used by the master playlist `RESOLUTION` attribute.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    fn validate(&self) -> PackResult<()> {
        let name_ok = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !name_ok {
            return Err(PackError::invalid_configuration(format!(
                "rendition name '{}' must be non-empty and contain only [A-Za-z0-9_-]",
                self.name
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' width/height must be non-zero",
                self.name
            )));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output needs even dimensions.
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' width/height must be even",
                self.name
            )));
        }
        if self.video_bitrate_bps == 0 || self.audio_bitrate_bps == 0 {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' bitrates must be non-zero",
                self.name
            )));
        }
        if self.video_max_bitrate_bps < self.video_bitrate_bps {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' max bitrate is below its target bitrate",
                self.name
            )));
        }
        if self.video_buffer_size_bytes == 0 || self.audio_sample_rate_hz == 0 {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' buffer size and audio sample rate must be non-zero",
                self.name
            )));
        }
        if self
            .video_bitrate_bps
            .checked_add(self.audio_bitrate_bps)
            .is_none()
            || self.video_buffer_size_bytes.checked_mul(8).is_none()
        {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' bitrate or buffer size is out of range",
                self.name
            )));
        }
        if level::frame_macroblocks(self.width, self.height) > level::MAX_FRAME_MACROBLOCKS {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' {}x{} exceeds the H.264 level {} frame size",
                self.name, self.width, self.height, VIDEO_LEVEL
            )));
        }
        if self.video_max_bitrate_bps > level::MAX_VIDEO_BITRATE_BPS {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' max bitrate exceeds the H.264 level {} limit of {} bps",
                self.name,
                VIDEO_LEVEL,
                level::MAX_VIDEO_BITRATE_BPS
            )));
        }
        if self.quality_param > 51 {
            return Err(PackError::invalid_configuration(format!(
                "rendition '{}' quality_param must be within 0..=51",
                self.name
            )));
        }
        Ok(())
    }
}

/// Ordered, validated sequence of [`RenditionSpec`]s.
///
/// Order is significant: it is the order of entries in the master playlist.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Ladder {
    renditions: Vec<RenditionSpec>,
}

impl Ladder {
    /// Build a ladder, rejecting empty tables, malformed entries and duplicate names.
    pub fn new(renditions: Vec<RenditionSpec>) -> PackResult<Self> {
        if renditions.is_empty() {
            return Err(PackError::invalid_configuration("ladder must not be empty"));
        }
        let mut seen = HashSet::new();
        for r in &renditions {
            r.validate()?;
            if !seen.insert(r.name.as_str()) {
                return Err(PackError::invalid_configuration(format!(
                    "duplicate rendition name '{}'",
                    r.name
                )));
            }
        }
        Ok(Self { renditions })
    }

    /// Load a ladder from a JSON array of rendition specs.
    pub fn from_path(path: impl AsRef<Path>) -> PackResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PackError::invalid_configuration(format!(
                "open ladder JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a ladder from a JSON array of rendition specs.
    pub fn from_reader(r: impl Read) -> PackResult<Self> {
        let renditions: Vec<RenditionSpec> = serde_json::from_reader(r).map_err(|e| {
            PackError::invalid_configuration(format!("parse ladder JSON: {e}"))
        })?;
        Self::new(renditions)
    }

    /// Renditions in ladder order.
    pub fn renditions(&self) -> &[RenditionSpec] {
        &self.renditions
    }

    /// Number of renditions.
    pub fn len(&self) -> usize {
        self.renditions.len()
    }

    /// Always `false` for a constructed ladder; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.renditions.is_empty()
    }
}

impl Default for Ladder {
    /// 1080p/5000k+192k, 720p/2500k+128k, 480p/800k+96k.
    fn default() -> Self {
        Self {
            renditions: vec![
                RenditionSpec {
                    name: "1080".to_string(),
                    width: 1920,
                    height: 1080,
                    video_bitrate_bps: 5_000_000,
                    video_max_bitrate_bps: 5_350_000,
                    video_buffer_size_bytes: 937_500,
                    quality_param: 20,
                    audio_bitrate_bps: 192_000,
                    audio_sample_rate_hz: 48_000,
                },
                RenditionSpec {
                    name: "720".to_string(),
                    width: 1280,
                    height: 720,
                    video_bitrate_bps: 2_500_000,
                    video_max_bitrate_bps: 2_675_000,
                    video_buffer_size_bytes: 468_750,
                    quality_param: 21,
                    audio_bitrate_bps: 128_000,
                    audio_sample_rate_hz: 48_000,
                },
                RenditionSpec {
                    name: "480".to_string(),
                    width: 854,
                    height: 480,
                    video_bitrate_bps: 800_000,
                    video_max_bitrate_bps: 856_000,
                    video_buffer_size_bytes: 150_000,
                    quality_param: 23,
                    audio_bitrate_bps: 96_000,
                    audio_sample_rate_hz: 48_000,
                },
            ],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ladder/rendition.rs"]
mod tests;
