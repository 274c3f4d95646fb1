//! Read side of a dataset, as seen by activities

use std::cell::Ref;

use crate::dataset::DatasetHandle;
use crate::table::Table;

/// Exposes a dataset's current table for reading
///
/// A source holds a shared handle; it never copies or buffers the data.
#[derive(Clone)]
pub struct Source {
    /// The dataset read from
    dataset: DatasetHandle,
}

impl Source {
    /// Create a source over a dataset
    pub fn new(dataset: DatasetHandle) -> Self {
        Self { dataset }
    }

    /// Borrow the dataset's current table
    ///
    /// The borrow must be released before the same dataset is written to.
    pub fn get_data(&self) -> Ref<'_, Table> {
        Ref::map(self.dataset.borrow(), |dataset| dataset.get_data())
    }

    /// Location of the underlying dataset
    pub fn location(&self) -> String {
        self.dataset.borrow().location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{shared, Dataset, MemoryDataset};

    #[test]
    fn test_source_reflects_current_data() {
        let dataset = shared(MemoryDataset::new("src"));
        let source = Source::new(dataset.clone());
        assert!(source.get_data().is_empty());

        let table = Table::from_rows(&["a"], vec![vec![1.into()]]).unwrap();
        dataset.borrow_mut().write_data(table.clone()).unwrap();

        assert_eq!(*source.get_data(), table);
        assert_eq!(source.location(), "memory://src");
    }
}
