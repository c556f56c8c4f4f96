//! Store error types.

use std::io;
use thiserror::Error;

/// Store error type.
///
/// `NotFound` is the only kind the contract normalizes: every backend
/// reports a missing (or unreachable) file this way from `read`,
/// `get_metadata` and `destroy`. Write and listing failures surface as
/// `Io` or `Backend` unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file exists at the normalized path.
    #[error("File {0} not found")]
    NotFound(String),

    /// Disk I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Object-store failure other than a missing key.
    #[error("backend error: {0}")]
    Backend(String),

    /// The path cannot name a file (the store root).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Invalid store configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a Backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convert StoreError to std::io::Error for compatibility.
impl From<StoreError> for io::Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(path) => {
                io::Error::new(io::ErrorKind::NotFound, format!("File {path} not found"))
            }
            StoreError::Io(e) => e,
            StoreError::Backend(msg) => io::Error::other(msg),
            StoreError::InvalidPath(path) => {
                io::Error::new(io::ErrorKind::InvalidInput, format!("invalid path: {path}"))
            }
            StoreError::InvalidConfig(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
        }
    }
}

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("/some.path");
        assert_eq!(err.to_string(), "File /some.path not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_into_io_error() {
        let io_err: io::Error = StoreError::not_found("/x").into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let io_err: io::Error = StoreError::backend("connection reset").into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert!(!StoreError::backend("x").is_not_found());

        let io_err: io::Error = StoreError::invalid_path("/").into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
    }
}
