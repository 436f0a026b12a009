//! abrpack turns one finite source video into an HTTP Live Streaming adaptive-bitrate package.
//!
//! # Pipeline overview
//!
//! 1. **Guard**: if `output_root/master.m3u8` exists the run is already done; return immediately.
//! 2. **Plan**: `Ladder + PackSettings + SourceInfo -> Vec<EncodeJob>` (geometry, rates, paths).
//! 3. **Encode**: one decode of the source fanned out to every rendition by an
//!    [`EncodeBackend`] (the system `ffmpeg` by default), writing segments and variant playlists.
//! 4. **Verify**: every variant playlist is complete and segment `k` lines up across renditions.
//! 5. **Synthesize**: write the master playlist, last, atomically.
//!
//! Output layout:
//!
//! ```text
//! output_root/master.m3u8
//! output_root/<rendition>/stream.m3u8
//! output_root/<rendition>/seg000.ts, seg001.ts, ...
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod encode;
mod foundation;
mod ladder;
mod manifest;
mod pipeline;
mod plan;
mod source;

pub use encode::backend::EncodeBackend;
pub use encode::ffmpeg::{
    FfmpegBackend, FfmpegBackendOpts, build_args, filter_graph, is_ffmpeg_on_path, keyframe_expr,
};
pub use encode::verify::{
    ALIGNMENT_TOLERANCE_SECS, RenditionReport, check_alignment, verify_outputs,
};
pub use foundation::error::{ErrorKind, PackError, PackResult};
pub use ladder::rendition::{Ladder, RenditionSpec};
pub use manifest::master::{
    AUDIO_CODEC_TAG, MASTER_PLAYLIST_NAME, PackageManifestEntry, VIDEO_CODEC_TAG,
    manifest_entries, render_master, write_master,
};
pub use manifest::variant::{VariantPlaylist, VariantSegment, aligned_segment_durations};
pub use pipeline::guard::already_processed;
pub use pipeline::packager::{PackOutcome, PackageSummary, Packager};
pub use plan::geometry::ScaleGeometry;
pub use plan::planner::{
    AudioParams, EncodeJob, EncodeParams, SEGMENT_FILENAME_PATTERN, VARIANT_PLAYLIST_NAME,
    build_jobs, plan, prepare_output_root,
};
pub use plan::settings::{DEFAULT_PRESET, DEFAULT_SEGMENT_DURATION_SECS, PackSettings};
pub use source::media::{FrameRate, SourceInfo, check_source_readable, probe_source};
