use super::*;
use crate::ladder::rendition::Ladder;
use crate::manifest::variant::VariantSegment;
use crate::plan::planner::build_jobs;
use crate::plan::settings::PackSettings;
use crate::source::media::SourceInfo;
use std::path::PathBuf;

fn scratch_jobs(name: &str) -> Vec<EncodeJob> {
    let root = PathBuf::from("target").join("unit_verify").join(name);
    let _ = std::fs::remove_dir_all(&root);
    let source = SourceInfo {
        source_path: PathBuf::from("in.mp4"),
        width: 1920,
        height: 1080,
        duration_secs: Some(14.0),
        frame_rate: None,
        has_audio: true,
    };
    let jobs = build_jobs(&Ladder::default(), &PackSettings::new("in.mp4", &root), &source);
    for job in &jobs {
        std::fs::create_dir_all(&job.output_dir).unwrap();
    }
    jobs
}

fn write_rendition(job: &EncodeJob, durations: &[f64], ended: bool) {
    let segments = durations
        .iter()
        .enumerate()
        .map(|(k, d)| {
            let uri = EncodeJob::segment_filename(k);
            std::fs::write(job.output_dir.join(&uri), b"ts").unwrap();
            VariantSegment {
                duration_secs: *d,
                uri,
            }
        })
        .collect();
    let mut playlist = VariantPlaylist::vod(segments);
    playlist.ended = ended;
    std::fs::write(job.playlist_path(), playlist.render()).unwrap();
}

#[test]
fn aligned_outputs_pass() {
    let jobs = scratch_jobs("aligned");
    for job in &jobs {
        write_rendition(job, &[6.0, 6.0, 2.0], true);
    }
    let reports = verify_outputs(&jobs, Some(14.0)).unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[2].rendition_name, "480");
    assert!(reports.iter().all(|r| r.segment_count() == 3));
    assert!(reports.iter().all(|r| r.target_duration_secs == 6));
}

#[test]
fn missing_playlist_fails() {
    let jobs = scratch_jobs("missing_playlist");
    write_rendition(&jobs[0], &[6.0], true);
    write_rendition(&jobs[1], &[6.0], true);
    let err = verify_outputs(&jobs, None).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Encode);
    assert!(err.to_string().contains("480"));
}

#[test]
fn unterminated_playlist_fails() {
    let jobs = scratch_jobs("unterminated");
    write_rendition(&jobs[0], &[6.0], true);
    write_rendition(&jobs[1], &[6.0], false);
    write_rendition(&jobs[2], &[6.0], true);
    assert!(verify_outputs(&jobs, None).is_err());
}

#[test]
fn missing_segment_file_fails() {
    let jobs = scratch_jobs("missing_segment");
    for job in &jobs {
        write_rendition(job, &[6.0, 6.0], true);
    }
    std::fs::remove_file(jobs[1].output_dir.join("seg001.ts")).unwrap();
    let err = verify_outputs(&jobs, None).unwrap_err();
    assert!(err.to_string().contains("seg001.ts"));
}

#[test]
fn misaligned_renditions_fail() {
    let jobs = scratch_jobs("misaligned");
    write_rendition(&jobs[0], &[6.0, 6.0, 2.0], true);
    write_rendition(&jobs[1], &[6.0, 6.0, 2.0], true);
    write_rendition(&jobs[2], &[6.0, 8.0], true);
    assert!(verify_outputs(&jobs, None).is_err());
}

#[test]
fn alignment_tolerates_encoder_rounding() {
    let report = |name: &str, d: Vec<f64>| RenditionReport {
        rendition_name: name.to_string(),
        segment_durations_secs: d,
        target_duration_secs: 7,
    };
    let ok = [
        report("a", vec![6.0, 6.006, 1.5]),
        report("b", vec![6.02, 6.0, 1.52]),
    ];
    check_alignment(&ok).unwrap();
    let bad = [report("a", vec![6.0, 6.0]), report("b", vec![6.0, 5.5])];
    assert!(check_alignment(&bad).unwrap_err().to_string().contains("segment 1"));
    check_alignment(&[]).unwrap();
}

#[test]
fn accumulated_drift_is_rejected() {
    let report = |name: &str, d: Vec<f64>| RenditionReport {
        rendition_name: name.to_string(),
        segment_durations_secs: d,
        target_duration_secs: 7,
    };
    // Each segment is within tolerance, but boundaries walk apart by 0.09s per segment.
    let drifting = [
        report("a", vec![6.0, 6.0, 6.0, 6.0]),
        report("b", vec![6.09, 6.09, 6.09, 5.73]),
    ];
    let err = check_alignment(&drifting).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Encode);
    assert!(err.to_string().contains("segment 2"), "{err}");
}
