//! Synchronized multi-rendition encoding.
//!
//! The encoding capability is external: [`backend::EncodeBackend`] is the seam, and
//! [`ffmpeg::FfmpegBackend`] drives a single system `ffmpeg` process that decodes the source once
//! and fans it out to every rendition. [`verify`] checks the result before anything downstream
//! trusts it.

/// Encoding capability contract.
pub mod backend;
/// `ffmpeg`-based backend.
pub mod ffmpeg;
/// Post-encode output checks (completeness and cross-rendition alignment).
pub mod verify;
