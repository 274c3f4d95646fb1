//! Reader selection by backend name

use std::path::PathBuf;

#[cfg(feature = "database")]
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::reader::Reader;

/// Arguments handed to a [`ReaderConstructor`]
pub enum ReaderArgs<'a> {
    /// A file to read
    Path(PathBuf),

    /// A database table to read
    #[cfg(feature = "database")]
    Table {
        /// Table name, inserted into the query verbatim
        table_name: String,

        /// Open connection to run the query on
        connection: &'a Connection,

        /// Database file, for display only
        path: Option<PathBuf>,
    },

    #[doc(hidden)]
    #[cfg(not(feature = "database"))]
    _Lifetime(std::marker::PhantomData<&'a ()>),
}

impl ReaderArgs<'_> {
    fn shape(&self) -> &'static str {
        match self {
            Self::Path(_) => "a file path",
            #[cfg(feature = "database")]
            Self::Table { .. } => "a database table",
            #[cfg(not(feature = "database"))]
            Self::_Lifetime(_) => "nothing",
        }
    }
}

/// Builds a reader from its arguments
pub type ReaderConstructor = fn(ReaderArgs<'_>) -> Result<Box<dyn Reader>>;

fn wrong_arguments(backend: &str, expected: &str, args: &ReaderArgs<'_>) -> Error {
    Error::InvalidArgument(format!(
        "{backend} reader expects {expected}, got {}",
        args.shape()
    ))
}

#[cfg(feature = "csv")]
fn csv_reader(args: ReaderArgs<'_>) -> Result<Box<dyn Reader>> {
    match args {
        ReaderArgs::Path(path) => Ok(Box::new(crate::csv::CsvReader::new(path)?)),
        other => Err(wrong_arguments("csv", "a file path", &other)),
    }
}

#[cfg(feature = "json")]
fn json_reader(args: ReaderArgs<'_>) -> Result<Box<dyn Reader>> {
    match args {
        ReaderArgs::Path(path) => Ok(Box::new(crate::json::JsonReader::new(path)?)),
        other => Err(wrong_arguments("json", "a file path", &other)),
    }
}

#[cfg(feature = "database")]
fn database_reader(args: ReaderArgs<'_>) -> Result<Box<dyn Reader>> {
    match args {
        ReaderArgs::Table {
            table_name,
            connection,
            path,
        } => Ok(Box::new(crate::database::DatabaseReader::new(
            &table_name,
            connection,
            path,
        )?)),
        other => Err(wrong_arguments("database", "a database table", &other)),
    }
}

/// The registered backends, in lookup order
fn registry() -> Vec<(&'static str, ReaderConstructor)> {
    let mut readers: Vec<(&'static str, ReaderConstructor)> = Vec::new();

    #[cfg(feature = "csv")]
    readers.push(("csv", csv_reader));

    #[cfg(feature = "json")]
    readers.push(("json", json_reader));

    #[cfg(feature = "database")]
    readers.push(("database", database_reader));

    readers
}

/// Looks up reader constructors by backend name
pub struct ReaderFactory;

impl ReaderFactory {
    /// Get the constructor for a backend
    ///
    /// Names are matched case-insensitively against `csv`, `json` and
    /// `database`. Anything else, including a backend whose cargo feature is
    /// disabled, is [`Error::UnsupportedBackend`].
    pub fn get_reader(name: &str) -> Result<ReaderConstructor> {
        let wanted = name.to_lowercase();

        registry()
            .into_iter()
            .find(|(backend, _)| *backend == wanted)
            .map(|(_, constructor)| constructor)
            .ok_or_else(|| Error::UnsupportedBackend("Reader type not supported".to_string()))
    }

    /// Names of the registered backends
    pub fn backends() -> Vec<&'static str> {
        registry().into_iter().map(|(backend, _)| backend).collect()
    }
}
