//! Write side of a dataset, as seen by activities

use crate::dataset::DatasetHandle;
use crate::error::Result;
use crate::table::Table;

/// Forwards whole tables to a dataset's `write_data`
#[derive(Clone)]
pub struct Sink {
    /// The dataset written to
    dataset: DatasetHandle,
}

impl Sink {
    /// Create a sink over a dataset
    pub fn new(dataset: DatasetHandle) -> Self {
        Self { dataset }
    }

    /// Write a table to the dataset
    ///
    /// Errors from the dataset are returned unchanged; nothing is rolled back.
    pub fn write_data(&self, table: Table) -> Result<()> {
        self.dataset.borrow_mut().write_data(table)
    }

    /// Location of the underlying dataset
    pub fn location(&self) -> String {
        self.dataset.borrow().location()
    }
}
