//! SQLite table reader

use std::fmt;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tabkit_core::{Column, Table, Value};
use tracing::debug;

use crate::common::infer_temporal;
use crate::error::Result;
use crate::reader::{render, Reader};

fn cell(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Reads every row of one database table
///
/// The table name is inserted into `SELECT * FROM <table_name>` verbatim.
/// It is not quoted or escaped, so it must come from a trusted source.
pub struct DatabaseReader {
    /// Name of the table that was read
    table_name: String,

    /// Database file, when the caller supplied one
    path: Option<PathBuf>,

    /// Loaded table
    data: Table,
}

impl DatabaseReader {
    /// Run `SELECT * FROM <table_name>` on `connection`
    ///
    /// `path` only describes the database for [`Reader::location`]; the
    /// connection is used as given. An empty result keeps the column names.
    pub fn new(table_name: &str, connection: &Connection, path: Option<PathBuf>) -> Result<Self> {
        let sql = format!("SELECT * FROM {table_name}");
        let mut statement = connection.prepare(&sql)?;
        let names: Vec<String> = statement.column_names().into_iter().map(String::from).collect();

        let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        let mut rows = statement.query([])?;
        while let Some(row) = rows.next()? {
            for (index, column) in values.iter_mut().enumerate() {
                column.push(cell(row.get_ref(index)?));
            }
        }

        let columns = names
            .iter()
            .zip(values)
            .map(|(name, values)| infer_temporal(Column::from_mixed(name, values)))
            .collect();
        let data = Table::new(columns)?;

        debug!(table = table_name, rows = data.num_rows(), "Database reader loaded table");

        Ok(Self {
            table_name: table_name.to_string(),
            path,
            data,
        })
    }

    /// Name of the table that was read
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Database file, when known
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Reader for DatabaseReader {
    fn backend(&self) -> &'static str {
        "database"
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => format!("{}#{}", path.display(), self.table_name),
            None => self.table_name.clone(),
        }
    }

    fn data(&self) -> &Table {
        &self.data
    }

    fn into_data(self: Box<Self>) -> Table {
        self.data
    }
}

impl fmt::Display for DatabaseReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.data, f)
    }
}
