use std::path::Path;

use crate::foundation::error::PackResult;
use crate::plan::planner::EncodeJob;
use crate::source::media::SourceInfo;

/// External encoding capability.
///
/// Contract for `encode`: produce, for every job, numbered segment files and a finished variant
/// playlist under `job.output_dir`, with segment `k` covering `[k*D, (k+1)*D)` of the source in
/// every rendition. Returning `Ok` means all renditions are complete; on `Err` the caller treats
/// every rendition's output as discardable. Writes outside the jobs' output directories are not
/// allowed.
pub trait EncodeBackend {
    /// Read stream metadata from the source.
    fn probe(&self, source: &Path) -> PackResult<SourceInfo>;
    /// Encode all jobs from one pass over `source`. Blocks until done.
    fn encode(&self, jobs: &[EncodeJob], source: &Path) -> PackResult<()>;
}
