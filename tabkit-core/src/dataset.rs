//! Dataset trait and the in-memory implementation

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::schema::Schema;
use crate::table::Table;

/// Number of rows returned by [`Dataset::preview`]
pub const PREVIEW_ROWS: usize = 5;

/// A table bound to a storage location
///
/// Implementations load their table when constructed. Afterwards
/// [`get_data`](Dataset::get_data) reflects the last successful load or
/// [`write_data`](Dataset::write_data), never a partial update.
pub trait Dataset {
    /// Human-readable description of where the data lives
    fn location(&self) -> String;

    /// The current in-memory table
    fn get_data(&self) -> &Table;

    /// Persist `table` to the location, then make it the current table
    ///
    /// If persisting fails the error is returned and the current table is
    /// left as it was.
    fn write_data(&mut self, table: Table) -> Result<()>;

    /// The first [`PREVIEW_ROWS`] rows of the current table
    fn preview(&self) -> Table {
        self.get_data().head(PREVIEW_ROWS)
    }

    /// Inferred type of each column
    fn schema(&self) -> Schema {
        self.get_data().schema()
    }
}

/// Shared, single-threaded handle to a dataset
///
/// Sources and sinks hold one of these instead of owning the dataset.
pub type DatasetHandle = Rc<RefCell<dyn Dataset>>;

/// Wrap a dataset for sharing between sources, sinks and the caller
///
/// The returned handle keeps its concrete type; it coerces to
/// [`DatasetHandle`] when cloned into a source or sink.
pub fn shared<D: Dataset + 'static>(dataset: D) -> Rc<RefCell<D>> {
    Rc::new(RefCell::new(dataset))
}

/// A dataset with no backing storage
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    /// Label used as the location
    name: String,

    /// Current table
    data: Table,
}

impl MemoryDataset {
    /// Create an empty in-memory dataset
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: Table::empty(),
        }
    }

    /// Create an in-memory dataset holding `table`
    pub fn with_data(name: &str, table: Table) -> Self {
        Self {
            name: name.to_string(),
            data: table,
        }
    }
}

impl Dataset for MemoryDataset {
    fn location(&self) -> String {
        format!("memory://{}", self.name)
    }

    fn get_data(&self) -> &Table {
        &self.data
    }

    fn write_data(&mut self, table: Table) -> Result<()> {
        debug!(dataset = %self.name, rows = table.num_rows(), "Replacing in-memory table");
        self.data = table;
        Ok(())
    }
}
