//! Delimited text backend
//!
//! Typed columns are inferred per column on read; see
//! [`column_from_text`](crate::common::column_from_text).

mod cleaned;
mod parser;
mod reader;
mod writer;

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tabkit_core::Table;

use crate::error::Result;
use crate::format::{FileDataset, TableFormat};

pub use cleaned::CleanedCsvDataset;
pub use parser::{CsvParser, CsvReaderOptions};
pub use reader::CsvReader;
pub use writer::{CsvWriter, CsvWriterOptions};

/// CSV serialization settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsvFormat {
    /// Options used when parsing
    pub reader: CsvReaderOptions,

    /// Options used when writing
    pub writer: CsvWriterOptions,
}

impl TableFormat for CsvFormat {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Table> {
        CsvParser::new(self.reader.clone()).parse(bytes)
    }

    fn encode<W: Write>(&self, table: &Table, writer: W) -> Result<()> {
        CsvWriter::new(writer, self.writer.clone()).write_table(table)
    }
}

/// A dataset stored as a CSV file
pub type CsvDataset = FileDataset<CsvFormat>;

impl FileDataset<CsvFormat> {
    /// Open a CSV dataset with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_format(path, CsvFormat::default())
    }
}
