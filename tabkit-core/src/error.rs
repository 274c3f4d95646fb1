//! Error types for tables, datasets and pipelines

use std::io;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of a fault, independent of the concrete variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An invalid constructor argument or configuration value
    Config,

    /// Malformed source content on read, or a backend failure
    DataFault,

    /// A numeric result that would be negative where the domain forbids it
    NegativeResult,
}

/// Error type for core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid constructor argument
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Operation would produce a negative quantity
    #[error("{0}")]
    NegativeResult(String),

    /// Table shape or column-name invariant violated
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Values of incompatible types in one column
    #[error("Data type mismatch: {0}")]
    TypeMismatch(String),

    /// Column lookup by name failed
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failure reported by a storage backend
    #[error("{backend} backend error: {source}")]
    Backend {
        /// Name of the backend that failed
        backend: &'static str,
        /// Underlying backend error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wrap a backend-specific error
    pub fn backend<E>(backend: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Backend {
            backend,
            source: source.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::NegativeResult(_) => ErrorKind::NegativeResult,
            Self::SchemaMismatch(_)
            | Self::TypeMismatch(_)
            | Self::ColumnNotFound(_)
            | Self::Io(_)
            | Self::Backend { .. } => ErrorKind::DataFault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::Config("x".into()).kind(), ErrorKind::Config);
        assert_eq!(Error::NegativeResult("x".into()).kind(), ErrorKind::NegativeResult);
        assert_eq!(Error::SchemaMismatch("x".into()).kind(), ErrorKind::DataFault);

        let io = io::Error::new(io::ErrorKind::Other, "disk full");
        assert_eq!(Error::from(io).kind(), ErrorKind::DataFault);
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let err = Error::backend("csv", "unterminated quote");
        assert_eq!(err.to_string(), "csv backend error: unterminated quote");
        assert!(std::error::Error::source(&err).is_some());
    }
}
