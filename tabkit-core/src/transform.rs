//! Whole-table transformations applied after a dataset is fetched

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::column::{Column, Value};
use crate::error::Result;
use crate::table::Table;

/// A transformation from one table to another
pub trait TableTransform {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Transform a table
    fn apply(&self, table: Table) -> Result<Table>;
}

/// Drops every column whose values are all null
///
/// Tables without rows are returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropNullColumns;

impl TableTransform for DropNullColumns {
    fn name(&self) -> &str {
        "drop_null_columns"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        if table.is_empty() {
            return Ok(table);
        }

        let before = table.num_columns();
        let table = table.retain_columns(|c| !c.is_all_null());
        debug!(dropped = before - table.num_columns(), "Dropped all-null columns");

        Ok(table)
    }
}

/// Where [`CaptureTimestamp`] gets the time from
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Local wall-clock time at the moment the transform runs
    System,

    /// A fixed instant
    Fixed(NaiveDateTime),
}

impl Clock {
    fn now(self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => at,
        }
    }
}

/// Sets a column to the capture time on every row
///
/// An existing column with the same name is overwritten, so running this
/// twice records the second capture time, not the first.
#[derive(Debug, Clone)]
pub struct CaptureTimestamp {
    /// Name of the timestamp column
    column: String,

    /// Time source
    clock: Clock,
}

impl CaptureTimestamp {
    /// Default name of the timestamp column
    pub const DEFAULT_COLUMN: &'static str = "timestamp";

    /// Record wall-clock time in the given column
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            clock: Clock::System,
        }
    }

    /// Record a fixed instant in the given column
    pub fn at(column: &str, at: NaiveDateTime) -> Self {
        Self {
            column: column.to_string(),
            clock: Clock::Fixed(at),
        }
    }
}

impl Default for CaptureTimestamp {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLUMN)
    }
}

impl TableTransform for CaptureTimestamp {
    fn name(&self) -> &str {
        "capture_timestamp"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        let now = self.clock.now();
        let rows = table.num_rows();
        table.with_column(Column::repeat(&self.column, Value::Timestamp(now), rows))
    }
}

/// A chain of transforms applied in order
#[derive(Default)]
pub struct TransformChain {
    /// The transforms in this chain
    transforms: Vec<Box<dyn TableTransform>>,
}

impl TransformChain {
    /// Append a transform
    #[must_use]
    pub fn then<T: TableTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// The cleaning chain: drop all-null columns, then stamp the capture time
    pub fn cleaning() -> Self {
        Self::default()
            .then(DropNullColumns)
            .then(CaptureTimestamp::default())
    }

    /// Get a reference to the transforms in this chain
    pub fn transforms(&self) -> &[Box<dyn TableTransform>] {
        &self.transforms
    }
}

impl TableTransform for TransformChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        let mut current = table;

        for transform in &self.transforms {
            current = transform.apply(current)?;
        }

        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;
    use chrono::NaiveDate;

    fn instant(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn raw() -> Table {
        Table::from_rows(
            &["a", "b", "c"],
            vec![
                vec![1.into(), 4.into(), Value::Null],
                vec![2.into(), 5.into(), Value::Null],
                vec![3.into(), Value::Null, Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_drop_null_columns() {
        let cleaned = DropNullColumns.apply(raw()).unwrap();
        assert_eq!(cleaned.column_names(), vec!["a", "b"]);
        assert_eq!(cleaned.num_rows(), 3);
    }

    #[test]
    fn test_drop_null_columns_is_idempotent() {
        let once = DropNullColumns.apply(raw()).unwrap();
        let twice = DropNullColumns.apply(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_drop_null_columns_keeps_header_only_tables() {
        let table = Table::new(vec![Column::nulls("a", 0), Column::nulls("b", 0)]).unwrap();
        assert_eq!(DropNullColumns.apply(table.clone()).unwrap(), table);
    }

    #[test]
    fn test_all_null_table_keeps_its_rows() {
        let table = Table::new(vec![Column::nulls("a", 2), Column::nulls("b", 2)]).unwrap();
        let stamped = TransformChain::default()
            .then(DropNullColumns)
            .then(CaptureTimestamp::at("timestamp", instant(9)))
            .apply(table)
            .unwrap();

        assert_eq!(stamped.shape(), (2, 1));
        assert_eq!(stamped.column_names(), vec!["timestamp"]);
    }

    #[test]
    fn test_capture_timestamp_appends_column() {
        let stamped = CaptureTimestamp::at("timestamp", instant(9)).apply(raw()).unwrap();
        let column = stamped.column_by_name("timestamp").unwrap();

        assert_eq!(column.data_type(), DataType::Timestamp);
        assert_eq!(column.len(), 3);
        assert!(column.values().iter().all(|v| *v == Value::Timestamp(instant(9))));
    }

    #[test]
    fn test_capture_timestamp_is_not_idempotent() {
        // A second run overwrites the capture time instead of leaving it alone
        let once = CaptureTimestamp::at("timestamp", instant(9)).apply(raw()).unwrap();
        let twice = CaptureTimestamp::at("timestamp", instant(10)).apply(once.clone()).unwrap();

        assert_eq!(once.column_names(), twice.column_names());
        assert_ne!(once, twice);
        assert_eq!(twice.row(0).unwrap()[3], Value::Timestamp(instant(10)));
    }

    #[test]
    fn test_cleaning_chain() {
        let chain = TransformChain::default()
            .then(DropNullColumns)
            .then(CaptureTimestamp::at("captured", instant(12)));
        let result = chain.apply(raw()).unwrap();

        assert_eq!(result.column_names(), vec!["a", "b", "captured"]);
        assert_eq!(chain.transforms().len(), 2);
        assert_eq!(TransformChain::cleaning().transforms().len(), 2);
    }
}
