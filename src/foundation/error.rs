/// Convenience result type used across abrpack.
pub type PackResult<T> = Result<T, PackError>;

/// Top-level error taxonomy returned by the packaging pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PackError {
    /// Bad segment duration, empty or malformed ladder, or unwritable output root.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The source media file is missing or unreadable.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The external encoding capability failed or produced inconsistent output.
    #[error("encode error: {0}")]
    Encode(String),

    /// The master playlist could not be written.
    #[error("manifest write error: {0}")]
    ManifestWrite(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`PackError`], stable across message changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`PackError::InvalidConfiguration`].
    InvalidConfiguration,
    /// See [`PackError::SourceNotFound`].
    SourceNotFound,
    /// See [`PackError::Encode`].
    Encode,
    /// See [`PackError::ManifestWrite`].
    ManifestWrite,
    /// See [`PackError::Other`].
    Other,
}

impl PackError {
    /// Build a [`PackError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`PackError::SourceNotFound`] value.
    pub fn source_not_found(msg: impl Into<String>) -> Self {
        Self::SourceNotFound(msg.into())
    }

    /// Build a [`PackError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PackError::ManifestWrite`] value.
    pub fn manifest_write(msg: impl Into<String>) -> Self {
        Self::ManifestWrite(msg.into())
    }

    /// Return the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::SourceNotFound(_) => ErrorKind::SourceNotFound,
            Self::Encode(_) => ErrorKind::Encode,
            Self::ManifestWrite(_) => ErrorKind::ManifestWrite,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
