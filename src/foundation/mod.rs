//! Shared foundations.

/// Error taxonomy and result alias.
pub mod error;
