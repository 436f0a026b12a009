use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::foundation::error::{PackError, PackResult};
use crate::ladder::rendition::Ladder;
use crate::plan::planner::VARIANT_PLAYLIST_NAME;

/// File name of the master playlist under the output root.
pub const MASTER_PLAYLIST_NAME: &str = "master.m3u8";

/// RFC 6381 tag for H.264 High profile, level 4.0.
pub const VIDEO_CODEC_TAG: &str = "avc1.640028";

/// RFC 6381 tag for AAC-LC.
pub const AUDIO_CODEC_TAG: &str = "mp4a.40.2";

/// One `#EXT-X-STREAM-INF` entry of the master playlist.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PackageManifestEntry {
    /// Ladder name of the rendition.
    pub rendition_name: String,
    /// Advertised peak bandwidth in bits per second.
    pub bandwidth_bps: u64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Video codec tag for `CODECS`.
    pub video_codec_tag: String,
    /// Audio codec tag for `CODECS`; `None` for video-only output.
    pub audio_codec_tag: Option<String>,
    /// Variant playlist URI relative to the master playlist, always `/`-separated.
    pub variant_playlist_relative_path: String,
}

impl PackageManifestEntry {
    /// `CODECS` attribute value, video first.
    pub fn codecs(&self) -> String {
        match &self.audio_codec_tag {
            Some(audio) => format!("{},{}", self.video_codec_tag, audio),
            None => self.video_codec_tag.clone(),
        }
    }
}

/// One entry per ladder rendition, in ladder order.
///
/// Bandwidth is video plus audio target bitrate; without audio only the video bitrate counts.
pub fn manifest_entries(ladder: &Ladder, has_audio: bool) -> Vec<PackageManifestEntry> {
    ladder
        .renditions()
        .iter()
        .map(|spec| PackageManifestEntry {
            rendition_name: spec.name.clone(),
            bandwidth_bps: if has_audio {
                spec.bandwidth_bps()
            } else {
                spec.video_bitrate_bps
            },
            width: spec.width,
            height: spec.height,
            video_codec_tag: VIDEO_CODEC_TAG.to_string(),
            audio_codec_tag: has_audio.then(|| AUDIO_CODEC_TAG.to_string()),
            variant_playlist_relative_path: format!("{}/{}", spec.name, VARIANT_PLAYLIST_NAME),
        })
        .collect()
}

/// Render master playlist text. Deterministic for identical entries.
pub fn render_master(entries: &[PackageManifestEntry]) -> String {
    let mut out = String::new();
    out.push_str("#EXTM3U\n");
    out.push_str("#EXT-X-VERSION:3\n");
    for e in entries {
        let _ = writeln!(
            out,
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}x{},CODECS=\"{}\",NAME=\"{}\"",
            e.bandwidth_bps,
            e.width,
            e.height,
            e.codecs(),
            e.rendition_name
        );
        let _ = writeln!(out, "{}", e.variant_playlist_relative_path);
    }
    out
}

/// Write `output_root/master.m3u8` and return its path.
///
/// Content goes to a temporary sibling that is renamed into place, so the master playlist is
/// either absent or complete.
#[tracing::instrument(skip(entries), fields(entries = entries.len()))]
pub fn write_master(entries: &[PackageManifestEntry], output_root: &Path) -> PackResult<PathBuf> {
    let path = output_root.join(MASTER_PLAYLIST_NAME);
    let tmp = output_root.join(format!("{MASTER_PLAYLIST_NAME}.tmp"));
    let text = render_master(entries);

    let write_tmp = || -> std::io::Result<()> {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(text.as_bytes())?;
        f.sync_all()
    };
    if let Err(e) = write_tmp() {
        let _ = std::fs::remove_file(&tmp);
        return Err(PackError::manifest_write(format!(
            "write '{}': {e}",
            tmp.display()
        )));
    }
    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        PackError::manifest_write(format!(
            "rename '{}' -> '{}': {e}",
            tmp.display(),
            path.display()
        ))
    })?;

    tracing::info!(master = %path.display(), "wrote master playlist");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/master.rs"]
mod tests;
