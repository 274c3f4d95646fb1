//! Sequential pipeline execution

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::activity::Activity;
use crate::error::Result;

/// Execution state of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Not executing
    Idle,

    /// Executing activity `index` of `total`
    Running {
        /// Zero-based position of the running activity
        index: usize,
        /// Number of activities in the pipeline
        total: usize,
    },
}

/// Read-only view of a pipeline's execution state
///
/// Clones observe the same pipeline, so an activity holding one sees the
/// position it is running at.
#[derive(Debug, Clone)]
pub struct PipelineMonitor {
    state: Rc<Cell<PipelineState>>,
}

impl PipelineMonitor {
    /// Current execution state
    pub fn state(&self) -> PipelineState {
        self.state.get()
    }
}

/// Statistics from one pipeline execution
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Number of activities that ran to completion
    pub activities_run: usize,

    /// Time spent in each completed activity, in order
    pub activity_times: Vec<Duration>,

    /// Total execution time
    pub execution_time: Duration,
}

/// An ordered list of activities run one after another
///
/// Activities run in insertion order, each to completion before the next
/// starts. The first failure stops the run and is returned unchanged;
/// activities after it do not run and earlier ones are not rolled back.
pub struct Pipeline {
    /// Name used in logs
    name: String,

    /// The activities, in execution order
    activities: Vec<Box<dyn Activity>>,

    /// Current execution state, shared with monitors
    state: Rc<Cell<PipelineState>>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::named("pipeline")
    }

    /// Create an empty pipeline with a name for logging
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            activities: Vec::new(),
            state: Rc::new(Cell::new(PipelineState::Idle)),
        }
    }

    /// Append an activity
    pub fn add_activity<A: Activity + 'static>(&mut self, activity: A) {
        self.add_boxed(Box::new(activity));
    }

    /// Append an already boxed activity
    pub fn add_boxed(&mut self, activity: Box<dyn Activity>) {
        self.activities.push(activity);
    }

    /// Number of activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Check if the pipeline has no activities
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Current execution state
    pub fn state(&self) -> PipelineState {
        self.state.get()
    }

    /// A handle that reports the execution state while `execute` runs
    pub fn monitor(&self) -> PipelineMonitor {
        PipelineMonitor {
            state: Rc::clone(&self.state),
        }
    }

    /// Labels of the activities, in order
    pub fn labels(&self) -> Vec<String> {
        self.activities.iter().map(|a| a.label()).collect()
    }

    /// Run every activity once, in order
    ///
    /// May be called repeatedly; each call starts again from the first
    /// activity.
    pub fn execute(&mut self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let total = self.activities.len();
        let mut stats = PipelineStats::default();

        info!(pipeline = %self.name, activities = total, "Executing pipeline");

        for (index, activity) in self.activities.iter_mut().enumerate() {
            self.state.set(PipelineState::Running { index, total });
            let label = activity.label();
            debug!(pipeline = %self.name, index, activity = %label, "Starting activity");

            let activity_start = Instant::now();
            if let Err(err) = activity.start() {
                warn!(pipeline = %self.name, index, activity = %label, error = %err, "Activity failed, stopping pipeline");
                self.state.set(PipelineState::Idle);
                return Err(err);
            }

            stats.activity_times.push(activity_start.elapsed());
            stats.activities_run += 1;
        }

        self.state.set(PipelineState::Idle);
        stats.execution_time = start_time.elapsed();
        info!(
            pipeline = %self.name,
            activities = stats.activities_run,
            elapsed_ms = stats.execution_time.as_millis(),
            "Pipeline finished"
        );

        Ok(stats)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{CopyActivity, MockActivity, WaitActivity};
    use crate::dataset::{shared, Dataset, MemoryDataset};
    use crate::error::Error;
    use crate::sink::Sink;
    use crate::source::Source;
    use crate::table::Table;
    use mockall::Sequence;
    use std::cell::RefCell;

    fn mock_activity(seq: &mut Sequence, fails: bool) -> MockActivity {
        let mut mock = MockActivity::new();
        mock.expect_label().return_const("mock".to_string());
        mock.expect_start()
            .times(1)
            .in_sequence(seq)
            .returning(move || {
                if fails {
                    Err(Error::backend("mock", "activity failed"))
                } else {
                    Ok(())
                }
            });
        mock
    }

    #[test]
    fn test_runs_each_activity_once_in_order() {
        let mut seq = Sequence::new();
        let mut pipeline = Pipeline::new();
        for _ in 0..3 {
            pipeline.add_activity(mock_activity(&mut seq, false));
        }

        let stats = pipeline.execute().unwrap();
        assert_eq!(stats.activities_run, 3);
        assert_eq!(stats.activity_times.len(), 3);
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn test_failure_stops_later_activities() {
        let mut seq = Sequence::new();
        let first = mock_activity(&mut seq, false);
        let second = mock_activity(&mut seq, true);

        let mut third = MockActivity::new();
        third.expect_label().return_const("never".to_string());
        third.expect_start().never();

        let mut pipeline = Pipeline::named("failing");
        pipeline.add_activity(first);
        pipeline.add_activity(second);
        pipeline.add_activity(third);

        let err = pipeline.execute().unwrap_err();
        assert!(matches!(err, Error::Backend { backend: "mock", .. }));
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn test_execute_twice_reruns_everything() {
        let mut mock = MockActivity::new();
        mock.expect_label().return_const("mock".to_string());
        mock.expect_start().times(2).returning(|| Ok(()));

        let mut pipeline = Pipeline::new();
        pipeline.add_activity(mock);

        pipeline.execute().unwrap();
        pipeline.execute().unwrap();
    }

    #[test]
    fn test_monitor_sees_running_position() {
        let mut pipeline = Pipeline::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let monitor = pipeline.monitor();
            let seen = Rc::clone(&seen);
            let mut mock = MockActivity::new();
            mock.expect_label().return_const("mock".to_string());
            mock.expect_start().times(1).returning_st(move || {
                seen.borrow_mut().push(monitor.state());
                Ok(())
            });
            pipeline.add_activity(mock);
        }

        let monitor = pipeline.monitor();
        assert_eq!(monitor.state(), PipelineState::Idle);
        pipeline.execute().unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                PipelineState::Running { index: 0, total: 2 },
                PipelineState::Running { index: 1, total: 2 },
            ]
        );
        assert_eq!(monitor.state(), PipelineState::Idle);
    }

    #[test]
    fn test_empty_pipeline() {
        let mut pipeline = Pipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.execute().unwrap().activities_run, 0);
    }

    #[test]
    fn test_wait_then_copy() {
        let table = Table::from_rows(&["a"], vec![vec![1.into()], vec![2.into()]]).unwrap();
        let from = shared(MemoryDataset::with_data("from", table.clone()));
        let to = shared(MemoryDataset::new("to"));

        let mut pipeline = Pipeline::new();
        pipeline.add_activity(WaitActivity::new(Duration::from_millis(1)));
        pipeline.add_activity(CopyActivity::new(Source::new(from), Sink::new(to.clone())));

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.labels()[1], "copy(memory://from -> memory://to)");

        pipeline.execute().unwrap();
        assert_eq!(to.borrow().get_data(), &table);
    }
}
