//! Text table formats and the file-backed dataset built on them

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tabkit_core::error::Result as CoreResult;
use tabkit_core::{Dataset, Table};
use tracing::{debug, info};

use crate::common::read_source;
use crate::error::Result;

/// A serialization of whole tables to and from bytes
pub trait TableFormat {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Parse a complete document into a table
    fn decode(&self, bytes: &[u8]) -> Result<Table>;

    /// Serialize a table as a complete document
    fn encode<W: Write>(&self, table: &Table, writer: W) -> Result<()>;
}

/// Load a table from `path`, treating a missing or blank file as empty
pub(crate) fn load_or_empty<F: TableFormat>(format: &F, path: &Path) -> Result<Table> {
    match read_source(path).and_then(|bytes| format.decode(&bytes)) {
        Ok(table) => {
            debug!(
                format = format.name(),
                path = %path.display(),
                rows = table.num_rows(),
                columns = table.num_columns(),
                "Loaded table"
            );
            Ok(table)
        }
        Err(err) if err.is_no_data() => {
            info!(format = format.name(), path = %path.display(), "No data found, starting empty");
            Ok(Table::empty())
        }
        Err(err) => Err(err),
    }
}

/// Serialize `table` to `path`, replacing the file
pub(crate) fn save<F: TableFormat>(format: &F, path: &Path, table: &Table) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    format.encode(table, &mut writer)?;
    writer.flush()?;

    debug!(
        format = format.name(),
        path = %path.display(),
        rows = table.num_rows(),
        "Wrote table"
    );
    Ok(())
}

/// A dataset stored in a single file in one [`TableFormat`]
#[derive(Debug, Clone)]
pub struct FileDataset<F: TableFormat> {
    /// Backing file
    path: PathBuf,

    /// Serialization used for reads and writes
    format: F,

    /// Current table
    data: Table,
}

impl<F: TableFormat> FileDataset<F> {
    /// Open a dataset with an explicit format
    ///
    /// Existing content is loaded now. A missing or blank file gives an empty
    /// table; malformed content is an error.
    pub fn with_format<P: AsRef<Path>>(path: P, format: F) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = load_or_empty(&format, &path)?;

        Ok(Self { path, format, data })
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The format used for reads and writes
    pub fn format(&self) -> &F {
        &self.format
    }
}

impl<F: TableFormat> Dataset for FileDataset<F> {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn get_data(&self) -> &Table {
        &self.data
    }

    fn write_data(&mut self, table: Table) -> CoreResult<()> {
        save(&self.format, &self.path, &table)?;
        self.data = table;
        Ok(())
    }
}
