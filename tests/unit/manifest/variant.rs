use super::*;

const FFMPEG_STYLE: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:6
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-PLAYLIST-TYPE:VOD
#EXTINF:6.000000,
seg000.ts
#EXTINF:6.000000,
seg001.ts
#EXTINF:2.500000,
seg002.ts
#EXT-X-ENDLIST
";

#[test]
fn parses_ffmpeg_output() {
    let pl = VariantPlaylist::parse(FFMPEG_STYLE).unwrap();
    assert_eq!(pl.version, 3);
    assert_eq!(pl.target_duration_secs, 6);
    assert!(pl.vod);
    assert!(pl.ended);
    assert_eq!(pl.segments.len(), 3);
    assert_eq!(pl.segments[2].uri, "seg002.ts");
    assert!((pl.total_duration_secs() - 14.5).abs() < 1e-9);
}

#[test]
fn vod_constructor_uses_ceiling_target_duration() {
    let pl = VariantPlaylist::vod(vec![
        VariantSegment {
            duration_secs: 6.006,
            uri: "seg000.ts".into(),
        },
        VariantSegment {
            duration_secs: 1.0,
            uri: "seg001.ts".into(),
        },
    ]);
    assert_eq!(pl.target_duration_secs, 7);
}

#[test]
fn render_matches_canonical_layout() {
    let pl = VariantPlaylist::vod(vec![VariantSegment {
        duration_secs: 6.0,
        uri: "seg000.ts".into(),
    }]);
    assert_eq!(
        pl.render(),
        "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:6\n#EXT-X-PLAYLIST-TYPE:VOD\n#EXTINF:6.000000,\nseg000.ts\n#EXT-X-ENDLIST\n"
    );
    assert_eq!(VariantPlaylist::parse(&pl.render()).unwrap(), pl);
}

#[test]
fn unterminated_playlist_is_parsed_as_not_ended() {
    let text = FFMPEG_STYLE.replace("#EXT-X-ENDLIST\n", "");
    assert!(!VariantPlaylist::parse(&text).unwrap().ended);
}

#[test]
fn malformed_playlists_are_rejected() {
    assert!(VariantPlaylist::parse("seg000.ts\n").is_err());
    assert!(VariantPlaylist::parse("#EXTM3U\n#EXTINF:6.0,\nseg000.ts\n").is_err());
    assert!(VariantPlaylist::parse("#EXTM3U\n#EXT-X-TARGETDURATION:6\nseg000.ts\n").is_err());
    assert!(VariantPlaylist::parse("#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:abc,\nx.ts\n").is_err());
}

#[test]
fn aligned_durations_cover_exact_and_ragged_sources() {
    assert_eq!(aligned_segment_durations(30.0, 6), vec![6.0; 5]);
    let ragged = aligned_segment_durations(32.5, 6);
    assert_eq!(ragged.len(), 6);
    assert!((ragged[5] - 2.5).abs() < 1e-9);
    assert!(aligned_segment_durations(0.0, 6).is_empty());
    assert!(aligned_segment_durations(10.0, 0).is_empty());
}
