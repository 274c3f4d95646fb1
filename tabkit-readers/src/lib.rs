//! File datasets and single-shot readers for tabkit tables
//!
//! This crate provides the CSV and JSON backends behind the core
//! [`Dataset`](tabkit_core::Dataset) contract, readers for CSV files, JSON
//! files and SQLite tables, and the [`ReaderFactory`] that selects a reader by
//! name. Each backend sits behind a cargo feature of the same name.

mod error;
mod factory;
mod format;
mod reader;

pub mod common;

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "database")]
pub mod database;

pub use error::{Error, Result};
pub use factory::{ReaderArgs, ReaderConstructor, ReaderFactory};
pub use format::{FileDataset, TableFormat};
pub use reader::Reader;

#[cfg(feature = "csv")]
pub use crate::csv::{CleanedCsvDataset, CsvDataset, CsvFormat, CsvReader};

#[cfg(feature = "json")]
pub use crate::json::{JsonDataset, JsonFormat, JsonOrientation, JsonReader};

#[cfg(feature = "database")]
pub use crate::database::DatabaseReader;

// Re-export core types
pub use tabkit_core::{Dataset, DatasetHandle, Table};
