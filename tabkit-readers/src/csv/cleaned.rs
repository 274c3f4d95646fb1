//! CSV dataset that cleans its source and saves to a separate target

use std::fmt;
use std::path::{Path, PathBuf};

use tabkit_core::error::Result as CoreResult;
use tabkit_core::{Dataset, Table, TableTransform, TransformChain};
use tracing::debug;

use crate::error::Result;
use crate::format::{load_or_empty, save};

use super::writer::CsvWriterOptions;
use super::CsvFormat;

/// A CSV file loaded, cleaned and stamped, then saved somewhere else
///
/// On open the source is read (a missing or blank source gives an empty
/// table) and passed through [`TransformChain::cleaning`]: all-null columns
/// are dropped and a `timestamp` column records the capture time. The source
/// file is never written. The target is written with a leading row-index
/// column.
pub struct CleanedCsvDataset {
    /// File the data is fetched from
    source: PathBuf,

    /// File the data is saved to
    target: PathBuf,

    /// Format used for both files
    format: CsvFormat,

    /// Cleaning applied after every fetch
    transform: TransformChain,

    /// Current table
    data: Table,
}

impl CleanedCsvDataset {
    /// Fetch and clean `source`, saving later to `target`
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(source: P, target: Q) -> Result<Self> {
        let format = CsvFormat {
            writer: CsvWriterOptions {
                write_index: true,
                ..Default::default()
            },
            ..Default::default()
        };
        Self::with_transform(source, target, format, TransformChain::cleaning())
    }

    /// Fetch `source` and apply a custom transform chain
    pub fn with_transform<P: AsRef<Path>, Q: AsRef<Path>>(
        source: P,
        target: Q,
        format: CsvFormat,
        transform: TransformChain,
    ) -> Result<Self> {
        let mut dataset = Self {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            format,
            transform,
            data: Table::empty(),
        };
        dataset.fetch_data()?;

        Ok(dataset)
    }

    /// Re-read the source and clean it again
    ///
    /// The capture time is taken anew on every fetch.
    pub fn fetch_data(&mut self) -> Result<&Table> {
        let raw = load_or_empty(&self.format, &self.source)?;
        let columns_before = raw.num_columns();
        self.data = self.transform.apply(raw)?;

        debug!(
            source = %self.source.display(),
            columns_before,
            columns_after = self.data.num_columns(),
            "Cleaned source table"
        );
        Ok(&self.data)
    }

    /// Write the current table to the target
    pub fn save_data(&self) -> Result<()> {
        save(&self.format, &self.target, &self.data)
    }

    /// File the data is fetched from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File the data is saved to
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Dataset for CleanedCsvDataset {
    fn location(&self) -> String {
        self.target.display().to_string()
    }

    fn get_data(&self) -> &Table {
        &self.data
    }

    fn write_data(&mut self, table: Table) -> CoreResult<()> {
        save(&self.format, &self.target, &table)?;
        self.data = table;
        Ok(())
    }
}

impl fmt::Display for CleanedCsvDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data is fetched from '{}':", self.source.display())?;
        crate::reader::render(&self.data, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tabkit_core::{CaptureTimestamp, DataType, DropNullColumns, Value};

    const RAW: &str = "name,age,unused,score\nann,31,,1.5\nbob,,,2.0\n";

    #[test]
    fn test_open_drops_null_columns_and_stamps() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("raw.csv");
        fs::write(&source, RAW).unwrap();

        let dataset = CleanedCsvDataset::open(&source, dir.path().join("clean.csv")).unwrap();
        let data = dataset.get_data();

        assert_eq!(data.column_names(), vec!["name", "age", "score", "timestamp"]);
        assert_eq!(data.column_by_name("timestamp").unwrap().data_type(), DataType::Timestamp);
        // a partly null column is kept
        assert_eq!(data.column_by_name("age").unwrap().null_count(), 1);
    }

    #[test]
    fn test_save_writes_target_only() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("raw.csv");
        let target = dir.path().join("clean.csv");
        fs::write(&source, RAW).unwrap();

        let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let chain = TransformChain::default()
            .then(DropNullColumns)
            .then(CaptureTimestamp::at("timestamp", at));
        let dataset = CleanedCsvDataset::with_transform(&source, &target, CsvFormat::default(), chain).unwrap();
        dataset.save_data().unwrap();

        assert_eq!(fs::read_to_string(&source).unwrap(), RAW);
        let saved = fs::read_to_string(&target).unwrap();
        assert_eq!(
            saved,
            "name,age,score,timestamp\nann,31,1.5,2024-03-01 08:00:00\nbob,,2.0,2024-03-01 08:00:00\n"
        );
    }

    #[test]
    fn test_missing_source_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CleanedCsvDataset::open(dir.path().join("absent.csv"), dir.path().join("out.csv")).unwrap();

        // the capture time column is still added, with no rows
        assert_eq!(dataset.get_data().num_rows(), 0);
        assert_eq!(dataset.get_data().column_names(), vec!["timestamp"]);
    }

    #[test]
    fn test_write_data_goes_to_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let mut dataset = CleanedCsvDataset::open(dir.path().join("absent.csv"), &target).unwrap();

        let table = Table::from_rows(&["a"], vec![vec![Value::Int64(7)]]).unwrap();
        dataset.write_data(table.clone()).unwrap();

        assert_eq!(dataset.get_data(), &table);
        assert_eq!(fs::read_to_string(&target).unwrap(), ",a\n0,7\n");
        assert_eq!(dataset.location(), target.display().to_string());
        assert_eq!(dataset.target(), target.as_path());
        assert!(dataset.source().ends_with("absent.csv"));
    }

    #[test]
    fn test_missing_markers_are_cleaned_away() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("raw.csv");
        fs::write(&source, "id,score,first\n1,NaN,Nan\n2,nan,Inf\n").unwrap();

        let dataset = CleanedCsvDataset::open(&source, dir.path().join("clean.csv")).unwrap();
        let data = dataset.get_data();

        assert_eq!(data.column_names(), vec!["id", "first", "timestamp"]);
        let first = data.column_by_name("first").unwrap();
        assert_eq!(first.data_type(), DataType::String);
        assert_eq!(first.values(), &[Value::from("Nan"), Value::from("Inf")]);
    }

    #[test]
    fn test_all_null_source_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("raw.csv");
        fs::write(&source, "a,b\n,\n,\n").unwrap();

        let dataset = CleanedCsvDataset::open(&source, dir.path().join("clean.csv")).unwrap();
        assert_eq!(dataset.get_data().shape(), (2, 1));
        assert_eq!(dataset.get_data().column_names(), vec!["timestamp"]);
    }
}
