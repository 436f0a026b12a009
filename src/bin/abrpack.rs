use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abrpack::{
    DEFAULT_PRESET, DEFAULT_SEGMENT_DURATION_SECS, ErrorKind, FfmpegBackend, FfmpegBackendOpts,
    Ladder, PackError, PackOutcome, PackSettings, Packager,
};

#[derive(Parser, Debug)]
#[command(name = "abrpack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Package the source into an HLS ladder (requires `ffmpeg` and `ffprobe` on PATH).
    Package(PackArgs),
    /// Print the encode jobs a package run would execute, as JSON.
    Plan(PackArgs),
}

#[derive(Args, Debug)]
struct PackArgs {
    /// Source video file.
    #[arg(long, env = "ABRPACK_SOURCE")]
    source: PathBuf,

    /// Output root directory.
    #[arg(long, env = "ABRPACK_OUTPUT_ROOT")]
    output_root: PathBuf,

    /// Segment duration in seconds.
    #[arg(long, env = "ABRPACK_SEGMENT_DURATION", default_value_t = DEFAULT_SEGMENT_DURATION_SECS)]
    segment_duration: u32,

    /// Ladder JSON (array of renditions). Defaults to 1080p/720p/480p.
    #[arg(long, env = "ABRPACK_LADDER")]
    ladder: Option<PathBuf>,

    /// x264 preset.
    #[arg(long, env = "ABRPACK_PRESET", default_value = DEFAULT_PRESET)]
    preset: String,

    /// Override ffmpeg worker threads.
    #[arg(long, env = "ABRPACK_THREADS")]
    threads: Option<usize>,

    /// Keep existing rendition directories instead of clearing them before encoding.
    #[arg(long, default_value_t = false)]
    keep_stale: bool,
}

impl PackArgs {
    fn into_packager(self) -> Result<Packager<FfmpegBackend>, PackError> {
        let ladder = match &self.ladder {
            Some(path) => Ladder::from_path(path)?,
            None => Ladder::default(),
        };
        let mut settings = PackSettings::new(self.source, self.output_root)
            .with_segment_duration(self.segment_duration)
            .with_preset(self.preset);
        settings.clean_stale_renditions = !self.keep_stale;
        let backend = FfmpegBackend::new(FfmpegBackendOpts {
            threads: self.threads,
        });
        Ok(Packager::new(ladder, settings, backend))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Package(args) => cmd_package(args),
        Command::Plan(args) => cmd_plan(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(exit_status(e.kind()))
        }
    }
}

fn exit_status(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Other => 1,
        ErrorKind::InvalidConfiguration => 2,
        ErrorKind::SourceNotFound => 3,
        ErrorKind::Encode => 4,
        ErrorKind::ManifestWrite => 5,
    }
}

fn cmd_package(args: PackArgs) -> Result<(), PackError> {
    let packager = args.into_packager()?;
    match packager.run()? {
        PackOutcome::AlreadyProcessed { master_path } => {
            eprintln!("already processed: {}", master_path.display());
        }
        PackOutcome::Packaged(summary) => {
            for r in &summary.renditions {
                eprintln!("{}: {} segments", r.rendition_name, r.segment_count());
            }
            eprintln!("wrote {}", summary.master_path.display());
        }
    }
    Ok(())
}

fn cmd_plan(args: PackArgs) -> Result<(), PackError> {
    let packager = args.into_packager()?;
    let jobs = packager.dry_run()?;
    let json = serde_json::to_string_pretty(&jobs)
        .map_err(|e| PackError::Other(anyhow::anyhow!("serialize plan: {e}")))?;
    println!("{json}");
    Ok(())
}
