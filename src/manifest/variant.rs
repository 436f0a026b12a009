use std::fmt::Write as _;

use crate::foundation::error::{PackError, PackResult};

/// One `#EXTINF` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantSegment {
    /// Segment duration in seconds.
    pub duration_secs: f64,
    /// Segment URI, relative to the playlist.
    pub uri: String,
}

/// A VOD media playlist listing one rendition's segments.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantPlaylist {
    /// `#EXT-X-VERSION`.
    pub version: u8,
    /// `#EXT-X-TARGETDURATION`, whole seconds.
    pub target_duration_secs: u64,
    /// Whether `#EXT-X-PLAYLIST-TYPE:VOD` is present.
    pub vod: bool,
    /// Segments in playback order.
    pub segments: Vec<VariantSegment>,
    /// Whether `#EXT-X-ENDLIST` is present.
    pub ended: bool,
}

impl VariantPlaylist {
    /// Build a finished VOD playlist whose target duration is the ceiling of the longest segment.
    pub fn vod(segments: Vec<VariantSegment>) -> Self {
        let max = segments
            .iter()
            .map(|s| s.duration_secs)
            .fold(0.0_f64, f64::max);
        Self {
            version: 3,
            target_duration_secs: max.ceil() as u64,
            vod: true,
            segments,
            ended: true,
        }
    }

    /// Longest segment duration, `0.0` for an empty playlist.
    pub fn max_segment_secs(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.duration_secs)
            .fold(0.0_f64, f64::max)
    }

    /// Sum of all segment durations.
    pub fn total_duration_secs(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_secs).sum()
    }

    /// Parse playlist text. Unknown tags are ignored.
    pub fn parse(text: &str) -> PackResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        if lines.next() != Some("#EXTM3U") {
            return Err(PackError::encode("variant playlist does not start with #EXTM3U"));
        }

        let mut version = 1;
        let mut target_duration_secs = None;
        let mut vod = false;
        let mut ended = false;
        let mut pending: Option<f64> = None;
        let mut segments = Vec::new();

        for line in lines {
            if let Some(v) = line.strip_prefix("#EXT-X-VERSION:") {
                version = v
                    .parse()
                    .map_err(|_| PackError::encode(format!("bad #EXT-X-VERSION '{v}'")))?;
            } else if let Some(v) = line.strip_prefix("#EXT-X-TARGETDURATION:") {
                target_duration_secs = Some(v.parse::<u64>().map_err(|_| {
                    PackError::encode(format!("bad #EXT-X-TARGETDURATION '{v}'"))
                })?);
            } else if let Some(v) = line.strip_prefix("#EXT-X-PLAYLIST-TYPE:") {
                vod = v == "VOD";
            } else if line == "#EXT-X-ENDLIST" {
                ended = true;
            } else if let Some(v) = line.strip_prefix("#EXTINF:") {
                let dur = v.split(',').next().unwrap_or_default();
                let dur = dur
                    .parse::<f64>()
                    .map_err(|_| PackError::encode(format!("bad #EXTINF duration '{dur}'")))?;
                pending = Some(dur);
            } else if line.starts_with('#') {
                continue;
            } else {
                let duration_secs = pending.take().ok_or_else(|| {
                    PackError::encode(format!("segment '{line}' has no preceding #EXTINF"))
                })?;
                segments.push(VariantSegment {
                    duration_secs,
                    uri: line.to_string(),
                });
            }
        }

        let target_duration_secs = target_duration_secs
            .ok_or_else(|| PackError::encode("variant playlist has no #EXT-X-TARGETDURATION"))?;
        Ok(Self {
            version,
            target_duration_secs,
            vod,
            segments,
            ended,
        })
    }

    /// Render the canonical text form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("#EXTM3U\n");
        let _ = writeln!(out, "#EXT-X-VERSION:{}", self.version);
        let _ = writeln!(out, "#EXT-X-TARGETDURATION:{}", self.target_duration_secs);
        if self.vod {
            out.push_str("#EXT-X-PLAYLIST-TYPE:VOD\n");
        }
        for seg in &self.segments {
            let _ = writeln!(out, "#EXTINF:{:.6},", seg.duration_secs);
            let _ = writeln!(out, "{}", seg.uri);
        }
        if self.ended {
            out.push_str("#EXT-X-ENDLIST\n");
        }
        out
    }
}

/// Segment durations of a `total_secs` long source cut every `segment_secs` seconds.
///
/// `ceil(T/D)` entries, all `D` except a possibly shorter last one.
pub fn aligned_segment_durations(total_secs: f64, segment_secs: u32) -> Vec<f64> {
    if segment_secs == 0 || !total_secs.is_finite() || total_secs <= 0.0 {
        return Vec::new();
    }
    let d = f64::from(segment_secs);
    let full = (total_secs / d).floor() as usize;
    let rest = total_secs - full as f64 * d;
    let mut out = vec![d; full];
    if rest > 1e-6 {
        out.push(rest);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/variant.rs"]
mod tests;
