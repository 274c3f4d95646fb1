//! Error types for datasets and readers

use tabkit_core::error::{Error as CoreError, ErrorKind};
use thiserror::Error;

/// Error type for datasets and readers
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV format error
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON format error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQL error
    #[cfg(feature = "database")]
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The location holds no data
    #[error("No data: {0}")]
    NoData(String),

    /// Source content has an unsupported layout
    #[error("Format error: {0}")]
    Format(String),

    /// Unknown or disabled reader backend
    #[error("{0}")]
    UnsupportedBackend(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Core(e) => e.kind(),
            Self::UnsupportedBackend(_) | Self::InvalidArgument(_) => ErrorKind::Config,
            _ => ErrorKind::DataFault,
        }
    }

    /// Check if this error only reports an absent or empty source
    pub fn is_no_data(&self) -> bool {
        match self {
            Self::NoData(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<Error> for CoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Core(e) => e,
            Error::Io(e) => CoreError::Io(e),
            #[cfg(feature = "csv")]
            Error::Csv(e) => CoreError::backend("csv", e),
            #[cfg(feature = "json")]
            Error::Json(e) => CoreError::backend("json", e),
            #[cfg(feature = "database")]
            Error::Sql(e) => CoreError::backend("database", e),
            Error::UnsupportedBackend(msg) | Error::InvalidArgument(msg) => CoreError::Config(msg),
            err @ (Error::NoData(_) | Error::Format(_)) => CoreError::backend("readers", err.to_string()),
        }
    }
}

/// Result type for datasets and readers
pub type Result<T> = std::result::Result<T, Error>;
