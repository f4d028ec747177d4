use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Operation not supported by this storage backend")]
    Unsupported,

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Violations of a bounded window's contract.
///
/// These surface through the `std::io` traits as [`std::io::Error`] values
/// wrapping the original variant, so callers can match on the exact cause
/// with [`std::io::Error::get_ref`] and a downcast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstreamError {
    #[error("substream is disposed")]
    Disposed,

    #[error("cannot position outside of the window bounds (length {len})")]
    OutOfBounds { len: u64 },

    #[error("write of {count} bytes exceeds the window bounds ({remaining} bytes remaining)")]
    WriteBeyondWindow { count: usize, remaining: u64 },
}

impl From<SubstreamError> for std::io::Error {
    fn from(err: SubstreamError) -> Self {
        let kind = match err {
            SubstreamError::Disposed => std::io::ErrorKind::Other,
            SubstreamError::OutOfBounds { .. } => std::io::ErrorKind::InvalidInput,
            SubstreamError::WriteBeyondWindow { .. } => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err)
    }
}

impl SubstreamError {
    /// Extract the substream cause from an I/O error, if it carries one.
    pub fn from_io(err: &std::io::Error) -> Option<&SubstreamError> {
        err.get_ref().and_then(|inner| inner.downcast_ref())
    }
}
