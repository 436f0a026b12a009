use rayon::prelude::*;

use crate::foundation::error::{PackError, PackResult};
use crate::manifest::variant::{VariantPlaylist, aligned_segment_durations};
use crate::plan::planner::EncodeJob;

/// Per-index duration and start-time difference tolerated between renditions, in seconds.
pub const ALIGNMENT_TOLERANCE_SECS: f64 = 0.1;

/// What one rendition produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenditionReport {
    /// Ladder name of the rendition.
    pub rendition_name: String,
    /// Segment durations in playlist order.
    pub segment_durations_secs: Vec<f64>,
    /// `#EXT-X-TARGETDURATION` of the variant playlist.
    pub target_duration_secs: u64,
}

impl RenditionReport {
    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segment_durations_secs.len()
    }
}

/// Check every job's variant playlist and segments, then cross-check alignment.
///
/// Renditions are inspected in parallel; results keep job order. Any problem is an
/// [`PackError::Encode`]: the encoder's output cannot be trusted, so the run must not finish.
#[tracing::instrument(skip_all, fields(renditions = jobs.len()))]
pub fn verify_outputs(
    jobs: &[EncodeJob],
    expected_duration_secs: Option<f64>,
) -> PackResult<Vec<RenditionReport>> {
    let reports = jobs
        .par_iter()
        .map(verify_rendition)
        .collect::<PackResult<Vec<_>>>()?;

    check_alignment(&reports)?;

    if let (Some(total), Some(first), Some(job)) =
        (expected_duration_secs, reports.first(), jobs.first())
    {
        let expected =
            aligned_segment_durations(total, job.encode_params.segment_duration_secs).len();
        if expected != first.segment_count() {
            tracing::warn!(
                expected,
                actual = first.segment_count(),
                "segment count differs from source duration estimate"
            );
        }
    }
    Ok(reports)
}

fn verify_rendition(job: &EncodeJob) -> PackResult<RenditionReport> {
    let path = job.playlist_path();
    let text = std::fs::read_to_string(&path).map_err(|e| {
        PackError::encode(format!(
            "rendition '{}': cannot read variant playlist '{}': {e}",
            job.rendition_name,
            path.display()
        ))
    })?;
    let playlist = VariantPlaylist::parse(&text).map_err(|e| {
        PackError::encode(format!("rendition '{}': {e}", job.rendition_name))
    })?;

    if !playlist.ended {
        return Err(PackError::encode(format!(
            "rendition '{}': variant playlist has no #EXT-X-ENDLIST",
            job.rendition_name
        )));
    }
    if playlist.segments.is_empty() {
        return Err(PackError::encode(format!(
            "rendition '{}': variant playlist lists no segments",
            job.rendition_name
        )));
    }
    let max = playlist.max_segment_secs();
    if (playlist.target_duration_secs as f64) + 1e-3 < max {
        return Err(PackError::encode(format!(
            "rendition '{}': segment of {max:.3}s exceeds target duration {}s",
            job.rendition_name, playlist.target_duration_secs
        )));
    }
    for seg in &playlist.segments {
        if !job.output_dir.join(&seg.uri).is_file() {
            return Err(PackError::encode(format!(
                "rendition '{}': segment '{}' is listed but missing",
                job.rendition_name, seg.uri
            )));
        }
    }

    Ok(RenditionReport {
        rendition_name: job.rendition_name.clone(),
        segment_durations_secs: playlist.segments.iter().map(|s| s.duration_secs).collect(),
        target_duration_secs: playlist.target_duration_secs,
    })
}

/// Segment `k` must exist in every rendition, have the same duration and start at the same
/// time everywhere.
pub fn check_alignment(reports: &[RenditionReport]) -> PackResult<()> {
    let Some((first, rest)) = reports.split_first() else {
        return Ok(());
    };
    for other in rest {
        if other.segment_count() != first.segment_count() {
            return Err(PackError::encode(format!(
                "renditions '{}' and '{}' have different segment counts ({} vs {})",
                first.rendition_name,
                other.rendition_name,
                first.segment_count(),
                other.segment_count()
            )));
        }
        let misaligned = first
            .segment_durations_secs
            .iter()
            .zip(&other.segment_durations_secs)
            .position(|(a, b)| (a - b).abs() > ALIGNMENT_TOLERANCE_SECS);
        if let Some(k) = misaligned {
            return Err(PackError::encode(format!(
                "segment {k} of '{}' ({:.3}s) is not aligned with '{}' ({:.3}s)",
                other.rendition_name,
                other.segment_durations_secs[k],
                first.rendition_name,
                first.segment_durations_secs[k]
            )));
        }
        let (mut start_a, mut start_b) = (0.0_f64, 0.0_f64);
        for (k, (a, b)) in first
            .segment_durations_secs
            .iter()
            .zip(&other.segment_durations_secs)
            .enumerate()
        {
            if (start_a - start_b).abs() > ALIGNMENT_TOLERANCE_SECS {
                return Err(PackError::encode(format!(
                    "segment {k} of '{}' starts at {start_b:.3}s, '{}' at {start_a:.3}s",
                    other.rendition_name, first.rendition_name
                )));
            }
            start_a += a;
            start_b += b;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/verify.rs"]
mod tests;
