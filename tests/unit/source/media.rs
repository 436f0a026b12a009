use super::*;

#[test]
fn parses_video_audio_and_duration() {
    let json = br#"{
        "streams": [
            { "codec_type": "video", "width": 1920, "height": 1080 },
            { "codec_type": "audio" }
        ],
        "format": { "duration": "30.000000" }
    }"#;
    let info = parse_probe_json(Path::new("in.mp4"), json).unwrap();
    assert_eq!((info.width, info.height), (1920, 1080));
    assert!(info.has_audio);
    assert_eq!(info.duration_secs, Some(30.0));
}

#[test]
fn video_only_without_format_is_accepted() {
    let json = br#"{ "streams": [ { "codec_type": "video", "width": 640, "height": 480 } ] }"#;
    let info = parse_probe_json(Path::new("in.mp4"), json).unwrap();
    assert!(!info.has_audio);
    assert_eq!(info.duration_secs, None);
}

#[test]
fn missing_video_stream_is_an_encode_error() {
    let json = br#"{ "streams": [ { "codec_type": "audio" } ] }"#;
    let err = parse_probe_json(Path::new("in.mp3"), json).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Encode);
}

#[test]
fn missing_source_is_source_not_found() {
    let err = check_source_readable(Path::new("target/definitely/not/here.mp4")).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::SourceNotFound);
}

#[test]
fn directory_is_not_a_source() {
    let err = check_source_readable(Path::new(".")).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::SourceNotFound);
}

#[test]
fn rotated_stream_reports_display_dimensions() {
    let json = br#"{
        "streams": [
            {
                "codec_type": "video", "width": 1920, "height": 1080,
                "side_data_list": [ { "side_data_type": "Display Matrix", "rotation": -90 } ]
            }
        ]
    }"#;
    let info = parse_probe_json(Path::new("phone.mp4"), json).unwrap();
    assert_eq!((info.width, info.height), (1080, 1920));
}

#[test]
fn legacy_rotate_tag_is_honoured() {
    let json = br#"{
        "streams": [
            { "codec_type": "video", "width": 1280, "height": 720, "tags": { "rotate": "270" } }
        ]
    }"#;
    let info = parse_probe_json(Path::new("phone.mov"), json).unwrap();
    assert_eq!((info.width, info.height), (720, 1280));
}

#[test]
fn upside_down_stream_keeps_orientation() {
    let json = br#"{
        "streams": [
            {
                "codec_type": "video", "width": 1920, "height": 1080,
                "side_data_list": [ { "rotation": 180 } ]
            }
        ]
    }"#;
    let info = parse_probe_json(Path::new("in.mp4"), json).unwrap();
    assert_eq!((info.width, info.height), (1920, 1080));
}

#[test]
fn non_square_pixels_widen_display_size() {
    let json = br#"{
        "streams": [
            {
                "codec_type": "video", "width": 720, "height": 480,
                "sample_aspect_ratio": "32:27", "display_aspect_ratio": "16:9"
            }
        ]
    }"#;
    let info = parse_probe_json(Path::new("dvd.mpg"), json).unwrap();
    assert_eq!((info.width, info.height), (853, 480));
}

#[test]
fn unknown_sample_aspect_ratio_is_ignored() {
    let json = br#"{
        "streams": [
            { "codec_type": "video", "width": 640, "height": 480, "sample_aspect_ratio": "0:1" }
        ]
    }"#;
    let info = parse_probe_json(Path::new("in.mp4"), json).unwrap();
    assert_eq!((info.width, info.height), (640, 480));
}

#[test]
fn frame_rate_prefers_average_and_skips_unknown() {
    let json = br#"{
        "streams": [
            {
                "codec_type": "video", "width": 1920, "height": 1080,
                "avg_frame_rate": "0/0", "r_frame_rate": "60000/1001"
            }
        ]
    }"#;
    let info = parse_probe_json(Path::new("in.mp4"), json).unwrap();
    assert_eq!(info.frame_rate, Some(FrameRate { num: 60000, den: 1001 }));

    let json = br#"{
        "streams": [
            {
                "codec_type": "video", "width": 1920, "height": 1080,
                "avg_frame_rate": "25/1", "r_frame_rate": "50/1"
            }
        ]
    }"#;
    let info = parse_probe_json(Path::new("in.mp4"), json).unwrap();
    assert_eq!(info.frame_rate.map(FrameRate::fps), Some(25.0));
}

#[test]
fn halving_keeps_rates_exact() {
    assert_eq!(
        FrameRate { num: 60000, den: 1001 }.halved(),
        FrameRate { num: 30000, den: 1001 }
    );
    assert_eq!(FrameRate { num: 25, den: 1 }.halved(), FrameRate { num: 25, den: 2 });
    assert_eq!(FrameRate::parse("N/A"), None);
}
