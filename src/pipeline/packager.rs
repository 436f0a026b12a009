use std::path::PathBuf;

use crate::encode::backend::EncodeBackend;
use crate::encode::ffmpeg::{FfmpegBackend, FfmpegBackendOpts};
use crate::encode::verify::{RenditionReport, verify_outputs};
use crate::foundation::error::PackResult;
use crate::ladder::rendition::Ladder;
use crate::manifest::master::{MASTER_PLAYLIST_NAME, manifest_entries, write_master};
use crate::pipeline::guard::already_processed;
use crate::plan::planner::{EncodeJob, build_jobs, plan, prepare_output_root};
use crate::plan::settings::PackSettings;
use crate::source::media::{SourceInfo, check_source_readable};

/// Result of a successful [`Packager::run`].
#[derive(Clone, Debug, PartialEq)]
pub enum PackOutcome {
    /// A master playlist already existed; nothing was read or written.
    AlreadyProcessed {
        /// Path of the existing master playlist.
        master_path: PathBuf,
    },
    /// The full package was produced by this run.
    Packaged(PackageSummary),
}

/// Details of a completed packaging run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PackageSummary {
    /// Path of the written master playlist.
    pub master_path: PathBuf,
    /// Probed source metadata.
    pub source: SourceInfo,
    /// Per-rendition results in ladder order.
    pub renditions: Vec<RenditionReport>,
}

/// Drives one packaging run over an explicit ladder and settings.
///
/// Stages run strictly in order: settings check, idempotency guard, source check, output root
/// check, probe, plan, encode, verify, master playlist. The master playlist is written last and
/// only after every rendition verified, so a failed run never leaves one behind and rerunning is
/// always safe.
///
/// Two packagers must not share an output root concurrently; nothing here locks it.
pub struct Packager<B> {
    ladder: Ladder,
    settings: PackSettings,
    backend: B,
}

impl Packager<FfmpegBackend> {
    /// Packager using the system `ffmpeg`.
    pub fn with_ffmpeg(ladder: Ladder, settings: PackSettings) -> Self {
        Self::new(ladder, settings, FfmpegBackend::new(FfmpegBackendOpts::default()))
    }
}

impl<B: EncodeBackend> Packager<B> {
    /// Packager using a custom encoding backend.
    pub fn new(ladder: Ladder, settings: PackSettings, backend: B) -> Self {
        Self {
            ladder,
            settings,
            backend,
        }
    }

    /// The ladder being packaged.
    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    /// The run settings.
    pub fn settings(&self) -> &PackSettings {
        &self.settings
    }

    /// The encoding backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the pipeline.
    #[tracing::instrument(skip(self), fields(
        source = %self.settings.source_path.display(),
        output_root = %self.settings.output_root.display()
    ))]
    pub fn run(&self) -> PackResult<PackOutcome> {
        self.settings.validate()?;

        let output_root = &self.settings.output_root;
        if already_processed(output_root) {
            let master_path = output_root.join(MASTER_PLAYLIST_NAME);
            tracing::info!(master = %master_path.display(), "already processed, skipping");
            return Ok(PackOutcome::AlreadyProcessed { master_path });
        }

        let source = self.inspect_source()?;
        prepare_output_root(output_root)?;

        let jobs = plan(&self.ladder, &self.settings, &source)?;
        tracing::info!(
            renditions = jobs.len(),
            segment_secs = self.settings.segment_duration_secs,
            "encoding renditions"
        );
        self.backend.encode(&jobs, &self.settings.source_path)?;

        let renditions = verify_outputs(&jobs, source.duration_secs)?;
        for r in &renditions {
            tracing::debug!(
                rendition = %r.rendition_name,
                segments = r.segment_count(),
                "rendition verified"
            );
        }

        let entries = manifest_entries(&self.ladder, source.has_audio);
        let master_path = write_master(&entries, output_root)?;
        Ok(PackOutcome::Packaged(PackageSummary {
            master_path,
            source,
            renditions,
        }))
    }

    /// Validate and probe, then return the jobs a run would execute. Writes nothing.
    pub fn dry_run(&self) -> PackResult<Vec<EncodeJob>> {
        self.settings.validate()?;
        let source = self.inspect_source()?;
        Ok(build_jobs(&self.ladder, &self.settings, &source))
    }

    fn inspect_source(&self) -> PackResult<SourceInfo> {
        check_source_readable(&self.settings.source_path)?;
        let source = self.backend.probe(&self.settings.source_path)?;
        tracing::info!(
            width = source.width,
            height = source.height,
            duration_secs = ?source.duration_secs,
            has_audio = source.has_audio,
            "probed source"
        );
        Ok(source)
    }
}
