use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{PackError, PackResult};
use crate::ladder::rendition::{Ladder, RenditionSpec};
use crate::plan::geometry::ScaleGeometry;
use crate::plan::level::output_frame_rate;
use crate::plan::settings::PackSettings;
use crate::source::media::{FrameRate, SourceInfo};

/// File name of every rendition's variant playlist.
pub const VARIANT_PLAYLIST_NAME: &str = "stream.m3u8";

/// `printf`-style segment file name shared by every rendition.
pub const SEGMENT_FILENAME_PATTERN: &str = "seg%03d.ts";

/// Video encoder.
pub const VIDEO_CODEC: &str = "libx264";
/// H.264 profile passed to the encoder.
///
/// Profile and level are what the master playlist `CODECS` attribute advertises
/// (`avc1.640028`); they must change together with it.
pub const VIDEO_PROFILE: &str = "high";
/// H.264 level passed to the encoder. Frame size, frame rate and VBV max rate are kept within
/// it (see [`crate::plan::level`]).
pub const VIDEO_LEVEL: &str = "4.0";
/// Audio encoder.
pub const AUDIO_CODEC: &str = "aac";

/// Audio encode parameters for one rendition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AudioParams {
    /// Target bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Output sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Output channel count.
    pub channels: u16,
}

/// Encode parameters for one rendition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct EncodeParams {
    /// x264 preset.
    pub preset: String,
    /// Constant rate factor.
    pub crf: u8,
    /// Target video bitrate in bits per second.
    pub video_bitrate_bps: u64,
    /// VBV max rate in bits per second.
    pub video_max_bitrate_bps: u64,
    /// VBV buffer size in bits.
    pub video_buffer_size_bits: u64,
    /// Audio parameters; `None` when the source has no audio.
    pub audio: Option<AudioParams>,
    /// Output frame rate cap; `None` keeps the source rate.
    pub frame_rate: Option<FrameRate>,
    /// Segment duration `D`; a keyframe is forced at every multiple of it.
    pub segment_duration_secs: u32,
}

/// Concrete encode description for one rendition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct EncodeJob {
    /// Ladder name of the rendition.
    pub rendition_name: String,
    /// `output_root/<rendition_name>`.
    pub output_dir: PathBuf,
    /// Segment file name pattern, relative to `output_dir`.
    pub segment_filename_pattern: String,
    /// Scale/pad placement.
    pub scale_geometry: ScaleGeometry,
    /// Rate control and segmenting parameters.
    pub encode_params: EncodeParams,
}

impl EncodeJob {
    /// Absolute path of this rendition's variant playlist.
    pub fn playlist_path(&self) -> PathBuf {
        self.output_dir.join(VARIANT_PLAYLIST_NAME)
    }

    /// Absolute `printf`-style segment path pattern.
    pub fn segment_path_pattern(&self) -> PathBuf {
        self.output_dir.join(&self.segment_filename_pattern)
    }

    /// File name of segment `index` (`seg000.ts`, `seg001.ts`, ...).
    pub fn segment_filename(index: usize) -> String {
        format!("seg{index:03}.ts")
    }
}

/// Derive one [`EncodeJob`] per ladder rung, in ladder order. Pure; touches no files.
pub fn build_jobs(ladder: &Ladder, settings: &PackSettings, source: &SourceInfo) -> Vec<EncodeJob> {
    ladder
        .renditions()
        .iter()
        .map(|spec| build_job(spec, settings, source))
        .collect()
}

fn build_job(spec: &RenditionSpec, settings: &PackSettings, source: &SourceInfo) -> EncodeJob {
    let audio = source.has_audio.then(|| AudioParams {
        bitrate_bps: spec.audio_bitrate_bps,
        sample_rate_hz: spec.audio_sample_rate_hz,
        channels: 2,
    });
    EncodeJob {
        rendition_name: spec.name.clone(),
        output_dir: settings.output_root.join(&spec.name),
        segment_filename_pattern: SEGMENT_FILENAME_PATTERN.to_string(),
        scale_geometry: ScaleGeometry::fit(source.width, source.height, spec.width, spec.height),
        encode_params: EncodeParams {
            preset: settings.preset.clone(),
            crf: spec.quality_param,
            video_bitrate_bps: spec.video_bitrate_bps,
            video_max_bitrate_bps: spec.video_max_bitrate_bps,
            video_buffer_size_bits: spec.video_buffer_size_bits(),
            audio,
            frame_rate: output_frame_rate(source.frame_rate, spec.width, spec.height),
            segment_duration_secs: settings.segment_duration_secs,
        },
    }
}

/// Build the jobs and create each rendition's output directory.
///
/// With `clean_stale_renditions`, an existing rendition directory is removed first so segments
/// left by an earlier failed attempt cannot be mixed into this run's output.
#[tracing::instrument(skip_all, fields(renditions = ladder.len()))]
pub fn plan(
    ladder: &Ladder,
    settings: &PackSettings,
    source: &SourceInfo,
) -> PackResult<Vec<EncodeJob>> {
    let jobs = build_jobs(ladder, settings, source);
    for job in &jobs {
        if settings.clean_stale_renditions && job.output_dir.exists() {
            tracing::debug!(dir = %job.output_dir.display(), "removing stale rendition output");
            std::fs::remove_dir_all(&job.output_dir).with_context(|| {
                format!(
                    "failed to remove stale rendition directory '{}'",
                    job.output_dir.display()
                )
            })?;
        }
        std::fs::create_dir_all(&job.output_dir).with_context(|| {
            format!(
                "failed to create rendition directory '{}'",
                job.output_dir.display()
            )
        })?;
    }
    Ok(jobs)
}

/// Create `output_root` if needed and confirm files can be created inside it.
pub fn prepare_output_root(output_root: &Path) -> PackResult<()> {
    std::fs::create_dir_all(output_root).map_err(|e| {
        PackError::invalid_configuration(format!(
            "cannot create output root '{}': {e}",
            output_root.display()
        ))
    })?;
    let probe = output_root.join(".abrpack-write-probe");
    std::fs::write(&probe, b"").map_err(|e| {
        PackError::invalid_configuration(format!(
            "output root '{}' is not writable: {e}",
            output_root.display()
        ))
    })?;
    if let Err(e) = std::fs::remove_file(&probe) {
        tracing::debug!(path = %probe.display(), error = %e, "failed to remove write check file");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/plan/planner.rs"]
mod tests;
