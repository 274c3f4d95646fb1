//! CSV writer implementation

use std::io::Write;

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use tabkit_core::Table;

use crate::common::format_cell;
use crate::error::Result;

/// Options for CSV writer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvWriterOptions {
    /// Whether to write a header row
    pub write_header: bool,

    /// Whether to prepend an unnamed column holding the row index
    pub write_index: bool,

    /// Delimiter character
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Whether to quote all fields
    pub quote_all: bool,
}

impl Default for CsvWriterOptions {
    fn default() -> Self {
        Self {
            write_header: true,
            write_index: false,
            delimiter: b',',
            quote: b'"',
            quote_all: false,
        }
    }
}

/// CSV writer
pub struct CsvWriter<W: Write> {
    /// Inner CSV writer
    writer: csv::Writer<W>,

    /// Writer options
    options: CsvWriterOptions,
}

impl<W: Write> CsvWriter<W> {
    /// Create a new CSV writer
    pub fn new(writer: W, options: CsvWriterOptions) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .quote_style(if options.quote_all {
                csv::QuoteStyle::Always
            } else {
                csv::QuoteStyle::Necessary
            })
            .from_writer(writer);

        Self { writer, options }
    }

    /// Write a whole table
    ///
    /// A table without columns produces no output.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        if table.num_columns() == 0 {
            return Ok(());
        }

        if self.options.write_header {
            let mut header: Vec<&str> = Vec::with_capacity(table.num_columns() + 1);
            if self.options.write_index {
                header.push("");
            }
            header.extend(table.column_names());
            self.writer.write_record(&header)?;
        }

        for (index, row) in table.rows().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(row.len() + 1);
            if self.options.write_index {
                record.push(index.to_string());
            }
            record.extend(row.into_iter().map(format_cell));
            self.writer.write_record(&record)?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the inner writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}
