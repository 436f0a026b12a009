use std::fs::File;
use std::path::{Path, PathBuf};

use crate::foundation::error::{PackError, PackResult};

/// Basic metadata about the source video file.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SourceInfo {
    /// Source path as given to the prober.
    pub source_path: PathBuf,
    /// Display width of the first video stream: the stored width stretched by the sample
    /// aspect ratio, swapped with the height for sources rotated by 90 or 270 degrees.
    pub width: u32,
    /// Display height of the first video stream (see [`SourceInfo::width`]).
    pub height: u32,
    /// Container duration in seconds, when `ffprobe` reports one.
    pub duration_secs: Option<f64>,
    /// Average frame rate of the first video stream, when known.
    pub frame_rate: Option<FrameRate>,
    /// Whether at least one audio stream exists.
    pub has_audio: bool,
}

/// Rational frame rate as reported by `ffprobe` (`30000/1001`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameRate {
    /// Frames.
    pub num: u32,
    /// Per this many seconds. Never zero.
    pub den: u32,
}

impl FrameRate {
    /// Parse `num/den`; `0/0`, `N/A` and zero rates yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let (num, den) = s.trim().split_once('/')?;
        let num = num.parse::<u32>().ok()?;
        let den = den.parse::<u32>().ok()?;
        (num > 0 && den > 0).then_some(Self { num, den })
    }

    /// Frames per second.
    pub fn fps(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Half this rate (every other frame).
    pub fn halved(self) -> Self {
        if self.num.is_multiple_of(2) {
            Self {
                num: self.num / 2,
                den: self.den,
            }
        } else {
            Self {
                num: self.num,
                den: self.den.saturating_mul(2),
            }
        }
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Fail with [`PackError::SourceNotFound`] unless `path` is an existing, readable regular file.
///
/// Only opens the file; no media bytes are decoded.
pub fn check_source_readable(path: &Path) -> PackResult<()> {
    let meta = std::fs::metadata(path).map_err(|e| {
        PackError::source_not_found(format!("'{}': {e}", path.display()))
    })?;
    if !meta.is_file() {
        return Err(PackError::source_not_found(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    File::open(path).map_err(|e| {
        PackError::source_not_found(format!("'{}' is not readable: {e}", path.display()))
    })?;
    Ok(())
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    sample_aspect_ratio: Option<String>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(serde::Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

// Older ffprobe builds report rotation as a stream tag instead of display-matrix side data.
#[derive(serde::Deserialize, Default)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    fn rotation_degrees(&self) -> i64 {
        let rotation = self
            .side_data_list
            .iter()
            .find_map(|sd| sd.rotation)
            .or_else(|| self.tags.rotate.as_deref()?.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite())
            .unwrap_or(0.0);
        (rotation.round() as i64).rem_euclid(360)
    }

    fn sample_aspect_ratio(&self) -> Option<(u64, u64)> {
        let (num, den) = self.sample_aspect_ratio.as_deref()?.split_once(':')?;
        let num = num.trim().parse::<u64>().ok()?;
        let den = den.trim().parse::<u64>().ok()?;
        (num > 0 && den > 0).then_some((num, den))
    }

    fn frame_rate(&self) -> Option<FrameRate> {
        self.avg_frame_rate
            .as_deref()
            .and_then(FrameRate::parse)
            .or_else(|| self.r_frame_rate.as_deref().and_then(FrameRate::parse))
    }
}

/// Size of the picture as a player shows it, from stored dimensions, SAR and rotation.
fn display_dimensions(
    stored_width: u32,
    stored_height: u32,
    sample_aspect_ratio: Option<(u64, u64)>,
    rotation_degrees: i64,
) -> (u32, u32) {
    let width = match sample_aspect_ratio {
        Some((num, den)) if num != den => {
            let (num, den) = (u128::from(num), u128::from(den));
            let w = (u128::from(stored_width) * num * 2 + den) / (den * 2);
            u32::try_from(w).unwrap_or(u32::MAX).max(1)
        }
        _ => stored_width,
    };
    if rotation_degrees == 90 || rotation_degrees == 270 {
        (stored_height, width)
    } else {
        (width, stored_height)
    }
}

#[derive(serde::Deserialize, Default)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: ProbeFormat,
}

/// Probe source metadata through `ffprobe`.
pub fn probe_source(source_path: &Path) -> PackResult<SourceInfo> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| PackError::encode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(PackError::encode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(source_path, &out.stdout)
}

pub(crate) fn parse_probe_json(source_path: &Path, json: &[u8]) -> PackResult<SourceInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| PackError::encode(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            PackError::encode(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let stored_width = video_stream
        .width
        .ok_or_else(|| PackError::encode("missing video width from ffprobe"))?;
    let stored_height = video_stream
        .height
        .ok_or_else(|| PackError::encode("missing video height from ffprobe"))?;
    let rotation = video_stream.rotation_degrees();
    let (width, height) = display_dimensions(
        stored_width,
        stored_height,
        video_stream.sample_aspect_ratio(),
        rotation,
    );
    if (width, height) != (stored_width, stored_height) {
        tracing::debug!(
            stored_width,
            stored_height,
            width,
            height,
            rotation,
            "source display size differs from stored frame size"
        );
    }
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));
    let duration_secs = parsed
        .format
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);

    Ok(SourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_secs,
        frame_rate: video_stream.frame_rate(),
        has_audio,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/source/media.rs"]
mod tests;
