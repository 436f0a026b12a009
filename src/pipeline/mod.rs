//! The packaging pipeline: guard, plan, encode, verify, synthesize.

/// Completed-run detection.
pub mod guard;
/// Orchestration of one packaging run.
pub mod packager;
