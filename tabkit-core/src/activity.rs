//! Units of pipeline work

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::sink::Sink;
use crate::source::Source;

/// One unit of work in a pipeline
#[cfg_attr(test, mockall::automock)]
pub trait Activity {
    /// Short description used in logs
    fn label(&self) -> String;

    /// Run the activity to completion
    fn start(&mut self) -> Result<()>;
}

/// Blocks the calling thread for a fixed duration
#[derive(Debug, Clone, Copy)]
pub struct WaitActivity {
    /// How long to block
    duration: Duration,
}

impl WaitActivity {
    /// Wait for the given duration
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Wait for a number of seconds
    ///
    /// Negative or non-finite values are rejected.
    pub fn from_secs_f64(seconds: f64) -> Result<Self> {
        Duration::try_from_secs_f64(seconds)
            .map(Self::new)
            .map_err(|_| Error::Config(format!("wait duration must be a non-negative number of seconds, got {seconds}")))
    }

    /// The configured duration
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Activity for WaitActivity {
    fn label(&self) -> String {
        format!("wait({:?})", self.duration)
    }

    fn start(&mut self) -> Result<()> {
        thread::sleep(self.duration);
        Ok(())
    }
}

/// Copies the whole current table of a source into a sink
#[derive(Clone)]
pub struct CopyActivity {
    /// Where data is read from
    source: Source,

    /// Where data is written to
    sink: Sink,
}

impl CopyActivity {
    /// Create a copy activity
    pub fn new(source: Source, sink: Sink) -> Self {
        Self { source, sink }
    }
}

impl Activity for CopyActivity {
    fn label(&self) -> String {
        format!("copy({} -> {})", self.source.location(), self.sink.location())
    }

    fn start(&mut self) -> Result<()> {
        // Clone and release the borrow so source and sink may share a dataset
        let table = self.source.get_data().clone();
        debug!(rows = table.num_rows(), columns = table.num_columns(), "Copying table");
        self.sink.write_data(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{shared, Dataset, MemoryDataset};
    use crate::error::ErrorKind;
    use crate::table::Table;
    use std::time::Instant;
    use test_case::test_case;

    fn sample() -> Table {
        Table::from_rows(
            &["col1", "col2", "col3"],
            vec![
                vec![1.into(), 2.into(), 3.into()],
                vec![4.into(), 5.into(), 6.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_wait_blocks_for_duration() {
        let mut wait = WaitActivity::new(Duration::from_millis(20));
        let started = Instant::now();
        wait.start().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_zero_is_allowed() {
        let wait = WaitActivity::from_secs_f64(0.0).unwrap();
        assert_eq!(wait.duration(), Duration::ZERO);
    }

    #[test_case(-1.0; "negative")]
    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinite")]
    fn test_wait_rejects_invalid_seconds(seconds: f64) {
        let err = WaitActivity::from_secs_f64(seconds).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_copy_moves_whole_table() {
        let from = shared(MemoryDataset::with_data("from", sample()));
        let to = shared(MemoryDataset::new("to"));

        let mut copy = CopyActivity::new(Source::new(from.clone()), Sink::new(to.clone()));
        copy.start().unwrap();

        assert_eq!(to.borrow().get_data(), &sample());
        assert_eq!(to.borrow().get_data().shape(), (2, 3));
        // the source is left untouched
        assert_eq!(from.borrow().get_data(), &sample());
        assert_eq!(copy.label(), "copy(memory://from -> memory://to)");
    }

    #[test]
    fn test_copy_onto_same_dataset() {
        let dataset = shared(MemoryDataset::with_data("loop", sample()));
        let mut copy = CopyActivity::new(Source::new(dataset.clone()), Sink::new(dataset.clone()));
        copy.start().unwrap();
        assert_eq!(dataset.borrow().get_data(), &sample());
    }
}
