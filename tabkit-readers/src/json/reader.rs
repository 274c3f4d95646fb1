//! JSON reader implementation

use std::fmt;
use std::path::{Path, PathBuf};

use tabkit_core::Table;
use tracing::debug;

use crate::common::read_source;
use crate::error::Result;
use crate::reader::{render, Reader};

use super::parser::parse_document;

/// Reads a JSON file into a table once
pub struct JsonReader {
    /// File that was read
    path: PathBuf,

    /// Loaded table
    data: Table,
}

impl JsonReader {
    /// Read a JSON file in any supported layout
    ///
    /// A missing file is an I/O error and an empty file is
    /// [`Error::NoData`](crate::Error::NoData).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = parse_document(&read_source(&path)?)?;
        debug!(path = %path.display(), rows = data.num_rows(), "JSON reader loaded table");

        Ok(Self { path, data })
    }
}

impl Reader for JsonReader {
    fn backend(&self) -> &'static str {
        "json"
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

impl fmt::Display for JsonReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.data, f)
    }
}
