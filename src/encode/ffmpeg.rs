use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{BufRead as _, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::encode::backend::EncodeBackend;
use crate::foundation::error::{PackError, PackResult};
use crate::plan::planner::{AUDIO_CODEC, EncodeJob, VIDEO_CODEC, VIDEO_LEVEL, VIDEO_PROFILE};
use crate::source::media::{SourceInfo, probe_source};

const STDERR_TAIL_LINES: usize = 20;

/// Options for [`FfmpegBackend`].
#[derive(Clone, Debug, Default)]
pub struct FfmpegBackendOpts {
    /// Override ffmpeg's worker thread count (`-threads`).
    pub threads: Option<usize>,
}

/// Encoding backend that runs the system `ffmpeg`.
///
/// One process decodes the source once; a `split` filter fans the decoded frames out to one
/// scale/pad/encode/HLS-mux chain per job. Keyframes are forced at every multiple of the segment
/// duration with scene-cut detection off, so every rendition cuts segments on the same timestamps
/// and every segment starts with an IDR frame.
#[derive(Clone, Debug, Default)]
pub struct FfmpegBackend {
    opts: FfmpegBackendOpts,
}

impl FfmpegBackend {
    /// Create a backend with the given options.
    pub fn new(opts: FfmpegBackendOpts) -> Self {
        Self { opts }
    }
}

impl EncodeBackend for FfmpegBackend {
    fn probe(&self, source: &Path) -> PackResult<SourceInfo> {
        probe_source(source)
    }

    #[tracing::instrument(skip_all, fields(source = %source.display(), renditions = jobs.len()))]
    fn encode(&self, jobs: &[EncodeJob], source: &Path) -> PackResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(PackError::encode(
                "ffmpeg is required for HLS packaging, but was not found on PATH",
            ));
        }

        let args = build_args(jobs, source, &self.opts)?;
        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        tracing::debug!(?args, "spawning ffmpeg");

        let mut child = cmd.spawn().map_err(|e| {
            PackError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| PackError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        // Keep only the tail; a long encode can log a lot.
        let stderr_drain = std::thread::spawn(move || -> std::io::Result<VecDeque<String>> {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            for line in BufReader::new(stderr).lines() {
                let line = line?;
                tracing::warn!(target: "abrpack::ffmpeg", "{line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Ok(tail)
        });

        let status = child.wait().map_err(|e| {
            PackError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let tail = stderr_drain
            .join()
            .map_err(|_| PackError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| PackError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let tail: Vec<String> = tail.into_iter().collect();
            return Err(PackError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                tail.join("\n").trim()
            )));
        }
        Ok(())
    }
}

/// Full `ffmpeg` argument list for encoding `jobs` from `source` in one process.
pub fn build_args(
    jobs: &[EncodeJob],
    source: &Path,
    opts: &FfmpegBackendOpts,
) -> PackResult<Vec<OsString>> {
    if jobs.is_empty() {
        return Err(PackError::invalid_configuration("no encode jobs to run"));
    }

    let mut args: Vec<OsString> = Vec::new();
    push_all(
        &mut args,
        &["-y", "-hide_banner", "-nostdin", "-nostats", "-loglevel", "error"],
    );
    if let Some(threads) = opts.threads {
        let threads = threads.to_string();
        push_all(&mut args, &["-threads", threads.as_str()]);
    }
    args.push("-i".into());
    args.push(source.as_os_str().to_owned());
    args.push("-filter_complex".into());
    args.push(filter_graph(jobs).into());

    for (i, job) in jobs.iter().enumerate() {
        args.extend(output_args(i, job).into_iter().map(OsString::from));
        args.push("-hls_segment_filename".into());
        args.push(job.segment_path_pattern().into_os_string());
        args.push(job.playlist_path().into_os_string());
    }
    Ok(args)
}

fn push_all(args: &mut Vec<OsString>, items: &[&str]) {
    args.extend(items.iter().map(|s| OsString::from(*s)));
}

/// `[0:v:0]split=N[s0]...;[s0]scale..pad[v0];...`
pub fn filter_graph(jobs: &[EncodeJob]) -> String {
    let mut graph = format!("[0:v:0]split={}", jobs.len());
    for i in 0..jobs.len() {
        graph.push_str(&format!("[s{i}]"));
    }
    for (i, job) in jobs.iter().enumerate() {
        let fps = job
            .encode_params
            .frame_rate
            .map(|r| format!("fps={r},"))
            .unwrap_or_default();
        graph.push_str(&format!(";[s{i}]{fps}{}[v{i}]", job.scale_geometry.filter()));
    }
    graph
}

/// `-force_key_frames` expression placing an IDR frame at every multiple of `segment_secs`.
pub fn keyframe_expr(segment_secs: u32) -> String {
    format!("expr:gte(t,n_forced*{segment_secs})")
}

fn output_args(i: usize, job: &EncodeJob) -> Vec<String> {
    let p = &job.encode_params;
    let d = p.segment_duration_secs.to_string();
    let mut out = vec!["-map".to_string(), format!("[v{i}]")];

    match &p.audio {
        Some(audio) => out.extend([
            "-map".to_string(),
            "0:a:0".to_string(),
            "-c:a".to_string(),
            AUDIO_CODEC.to_string(),
            "-b:a".to_string(),
            audio.bitrate_bps.to_string(),
            "-ar".to_string(),
            audio.sample_rate_hz.to_string(),
            "-ac".to_string(),
            audio.channels.to_string(),
        ]),
        None => out.push("-an".to_string()),
    }

    let crf = p.crf.to_string();
    let bitrate = p.video_bitrate_bps.to_string();
    let max_bitrate = p.video_max_bitrate_bps.to_string();
    let bufsize = p.video_buffer_size_bits.to_string();
    let keyframes = keyframe_expr(p.segment_duration_secs);
    let video: &[&str] = &[
        "-c:v",
        VIDEO_CODEC,
        "-preset",
        p.preset.as_str(),
        "-profile:v",
        VIDEO_PROFILE,
        "-level:v",
        VIDEO_LEVEL,
        "-pix_fmt",
        "yuv420p",
        "-crf",
        crf.as_str(),
        "-b:v",
        bitrate.as_str(),
        "-maxrate",
        max_bitrate.as_str(),
        "-bufsize",
        bufsize.as_str(),
        "-force_key_frames",
        keyframes.as_str(),
        "-sc_threshold",
        "0",
        "-f",
        "hls",
        "-hls_time",
        d.as_str(),
        "-hls_playlist_type",
        "vod",
        "-hls_list_size",
        "0",
        "-hls_segment_type",
        "mpegts",
        "-start_number",
        "0",
    ];
    out.extend(video.iter().map(|s| s.to_string()));
    out
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
