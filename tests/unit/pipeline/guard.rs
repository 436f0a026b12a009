use super::*;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_guard").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn missing_root_is_not_processed() {
    assert!(!already_processed(Path::new("target/unit_guard/nope/nothing")));
}

#[test]
fn renditions_without_master_are_not_processed() {
    let root = scratch("partial");
    std::fs::create_dir_all(root.join("1080")).unwrap();
    std::fs::write(root.join("1080").join("stream.m3u8"), "#EXTM3U\n").unwrap();
    assert!(!already_processed(&root));
}

#[test]
fn master_marks_completion() {
    let root = scratch("complete");
    std::fs::write(root.join("master.m3u8"), "#EXTM3U\n").unwrap();
    assert!(already_processed(&root));
}

#[test]
fn leftover_temp_master_does_not_count() {
    let root = scratch("temp_only");
    std::fs::write(root.join("master.m3u8.tmp"), "#EXTM3U\n").unwrap();
    assert!(!already_processed(&root));
}
