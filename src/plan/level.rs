use crate::source::media::FrameRate;

/// Level 4.0 limit on decoded macroblocks per second.
pub const MAX_MACROBLOCKS_PER_SEC: u64 = 245_760;

/// Level 4.0 limit on macroblocks per frame.
pub const MAX_FRAME_MACROBLOCKS: u64 = 8_192;

/// Level 4.0 High profile limit on the VBV max rate, in bits per second.
pub const MAX_VIDEO_BITRATE_BPS: u64 = 25_000_000;

/// 16x16 macroblocks in one `width x height` frame.
pub fn frame_macroblocks(width: u32, height: u32) -> u64 {
    u64::from(width.div_ceil(16)) * u64::from(height.div_ceil(16))
}

/// Highest frame rate a `width x height` stream may have at level 4.0.
pub fn max_frame_rate(width: u32, height: u32) -> f64 {
    MAX_MACROBLOCKS_PER_SEC as f64 / frame_macroblocks(width, height).max(1) as f64
}

/// Output frame rate for a rendition, or `None` to keep the source rate.
///
/// Sources faster than the level allows are halved until they fit, so 59.94 becomes 29.97 and
/// 50 becomes 25.
pub fn output_frame_rate(source: Option<FrameRate>, width: u32, height: u32) -> Option<FrameRate> {
    let limit = max_frame_rate(width, height);
    let mut rate = source?;
    if rate.fps() <= limit {
        return None;
    }
    // Bounded: 32 halvings take any u32 rate below one frame per second.
    for _ in 0..32 {
        if rate.fps() <= limit {
            break;
        }
        rate = rate.halved();
    }
    Some(rate)
}

#[cfg(test)]
#[path = "../../tests/unit/plan/level.rs"]
mod tests;
