//! Core table type, dataset contract and activity pipeline
//!
//! This crate provides the in-memory [`Table`] that every other component
//! exchanges, the [`Dataset`] contract that storage backends implement, the
//! [`Source`]/[`Sink`] adapters, and a sequential [`pipeline::Pipeline`] of
//! [`Activity`] values. Storage backends themselves live in `tabkit-readers`.

#![warn(missing_docs)]

pub mod activity;
pub mod column;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod schedule;
pub mod schema;
pub mod sink;
pub mod source;
pub mod table;
pub mod transform;

// Re-export key types for convenience
pub use activity::{Activity, CopyActivity, WaitActivity};
pub use column::{Column, Value};
pub use dataset::{shared, Dataset, DatasetHandle, MemoryDataset, PREVIEW_ROWS};
pub use distance::Distance;
pub use error::{Error, ErrorKind, Result};
pub use schema::{DataType, Field, Schema};
pub use sink::Sink;
pub use source::Source;
pub use table::{Table, TableFormatter};
pub use transform::{CaptureTimestamp, DropNullColumns, TableTransform, TransformChain};

/// Pipeline configuration and execution
pub mod pipeline {
    pub use crate::schedule::Pipeline;
    pub use crate::schedule::PipelineMonitor;
    pub use crate::schedule::PipelineState;
    pub use crate::schedule::PipelineStats;
}
