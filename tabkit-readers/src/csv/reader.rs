//! CSV reader implementation

use std::fmt;
use std::path::{Path, PathBuf};

use tabkit_core::Table;
use tracing::debug;

use crate::common::read_source;
use crate::error::Result;
use crate::reader::{render, Reader};

use super::parser::{CsvParser, CsvReaderOptions};

/// Reads a CSV file into a table once
pub struct CsvReader {
    /// File that was read
    path: PathBuf,

    /// Loaded table
    data: Table,
}

impl CsvReader {
    /// Read a CSV file with default options
    ///
    /// A missing file is an I/O error and an empty file is
    /// [`Error::NoData`](crate::Error::NoData).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_options(path, CsvReaderOptions::default())
    }

    /// Read a CSV file
    pub fn with_options<P: AsRef<Path>>(path: P, options: CsvReaderOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = CsvParser::new(options).parse(&read_source(&path)?)?;
        debug!(path = %path.display(), rows = data.num_rows(), "CSV reader loaded table");

        Ok(Self { path, data })
    }
}

impl Reader for CsvReader {
    fn backend(&self) -> &'static str {
        "csv"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn data(&self) -> &Table {
        &self.data
    }

    fn into_data(self: Box<Self>) -> Table {
        self.data
    }
}

impl fmt::Display for CsvReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.data, f)
    }
}
