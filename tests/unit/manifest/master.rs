use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_master").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn entries_follow_ladder_with_summed_bandwidth() {
    let entries = manifest_entries(&Ladder::default(), true);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].rendition_name, "720");
    assert_eq!(entries[1].bandwidth_bps, 2_628_000);
    assert_eq!(entries[1].variant_playlist_relative_path, "720/stream.m3u8");
    assert_eq!(entries[1].codecs(), "avc1.640028,mp4a.40.2");
}

#[test]
fn video_only_entries_drop_audio() {
    let entries = manifest_entries(&Ladder::default(), false);
    assert_eq!(entries[0].bandwidth_bps, 5_000_000);
    assert_eq!(entries[0].codecs(), "avc1.640028");
}

#[test]
fn render_is_exact() {
    let text = render_master(&manifest_entries(&Ladder::default(), true));
    let expected = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=5192000,RESOLUTION=1920x1080,CODECS=\"avc1.640028,mp4a.40.2\",NAME=\"1080\"
1080/stream.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2628000,RESOLUTION=1280x720,CODECS=\"avc1.640028,mp4a.40.2\",NAME=\"720\"
720/stream.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=896000,RESOLUTION=854x480,CODECS=\"avc1.640028,mp4a.40.2\",NAME=\"480\"
480/stream.m3u8
";
    assert_eq!(text, expected);
}

#[test]
fn write_is_byte_for_byte_reproducible() {
    let root = scratch("reproducible");
    let entries = manifest_entries(&Ladder::default(), true);
    let path = write_master(&entries, &root).unwrap();
    let first = std::fs::read(&path).unwrap();
    write_master(&entries, &root).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), first);
    assert!(!root.join("master.m3u8.tmp").exists());
}

#[test]
fn unwritable_root_is_a_manifest_write_error() {
    let root = scratch("missing").join("does-not-exist");
    let err = write_master(&manifest_entries(&Ladder::default(), true), &root).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::ManifestWrite);
    assert!(!root.join(MASTER_PLAYLIST_NAME).exists());
}
