use super::*;

fn rate(num: u32, den: u32) -> Option<FrameRate> {
    Some(FrameRate { num, den })
}

#[test]
fn full_hd_fits_thirty_fps() {
    assert_eq!(frame_macroblocks(1920, 1080), 120 * 68);
    assert!(max_frame_rate(1920, 1080) > 30.0);
    assert!(max_frame_rate(1920, 1080) < 31.0);
}

#[test]
fn sources_within_the_limit_keep_their_rate() {
    assert_eq!(output_frame_rate(rate(30000, 1001), 1920, 1080), None);
    assert_eq!(output_frame_rate(rate(30, 1), 1920, 1080), None);
    assert_eq!(output_frame_rate(rate(60, 1), 1280, 720), None);
    assert_eq!(output_frame_rate(None, 1920, 1080), None);
}

#[test]
fn high_frame_rate_full_hd_is_halved() {
    assert_eq!(output_frame_rate(rate(60000, 1001), 1920, 1080), rate(30000, 1001));
    assert_eq!(output_frame_rate(rate(50, 1), 1920, 1080), rate(25, 1));
    assert_eq!(output_frame_rate(rate(120, 1), 1920, 1080), rate(30, 1));
}
