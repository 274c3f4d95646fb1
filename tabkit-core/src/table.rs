//! In-memory table of named, row-aligned columns

use std::collections::HashSet;
use std::fmt;

use crate::column::{Column, Value};
use crate::error::{Error, Result};
use crate::schema::{Field, Schema};

/// A collection of equally long, uniquely named columns
///
/// This is the common currency between datasets, readers and activities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Columns in this table
    columns: Vec<Column>,

    /// Number of rows in this table
    row_count: usize,
}

impl Table {
    /// Create a new table from columns
    ///
    /// All columns must have the same length and distinct names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);

        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != row_count {
                return Err(Error::SchemaMismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    row_count
                )));
            }
            if !names.insert(column.name()) {
                return Err(Error::SchemaMismatch(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Create a table with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a table from row-major values
    ///
    /// Column types are inferred; see [`Column::new`].
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut values: Vec<Vec<Value>> = names.iter().map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(Error::SchemaMismatch(format!(
                    "row {} has {} values, expected {}",
                    row_idx,
                    row.len(),
                    names.len()
                )));
            }
            for (col_values, value) in values.iter_mut().zip(row) {
                col_values.push(value);
            }
        }

        let columns = names
            .iter()
            .zip(values)
            .map(|(name, values)| Column::new(name.as_ref(), values))
            .collect::<Result<Vec<_>>>()?;

        Self::new(columns)
    }

    /// Get the number of rows in this table
    pub fn num_rows(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns in this table
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    /// Check if this table has no rows
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Names of all columns, in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// All columns, in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by index
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Get a column by name
    pub fn column_by_name(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Get the values of one row
    pub fn row(&self, index: usize) -> Option<Vec<Value>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values()[index].clone()).collect())
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).map(move |i| self.columns.iter().map(|c| &c.values()[i]).collect())
    }

    /// Copy of the first `n` rows (or fewer)
    pub fn head(&self, n: usize) -> Self {
        let columns: Vec<Column> = self.columns.iter().map(|c| c.head(n)).collect();

        Self {
            columns,
            row_count: self.row_count.min(n),
        }
    }

    /// Schema of this table
    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| Field::new(c.name(), c.data_type(), c.null_count() > 0))
                .collect(),
        )
    }

    /// Add a column, replacing any column with the same name in place
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::SchemaMismatch(format!(
                "column '{}' has {} rows, expected {}",
                column.name(),
                column.len(),
                self.row_count
            )));
        }

        if self.columns.is_empty() {
            self.row_count = column.len();
        }

        match self.columns.iter_mut().find(|c| c.name() == column.name()) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }

        Ok(self)
    }

    /// Keep only the columns matching a predicate
    ///
    /// The row count is unchanged, even when no column is kept.
    pub fn retain_columns<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&Column) -> bool,
    {
        self.columns.retain(|c| keep(c));
        self
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TableFormatter::default().write(self, f)
    }
}

/// Bounded text rendering of a table
#[derive(Debug, Clone)]
pub struct TableFormatter {
    /// Maximum rows to render; the middle is elided beyond this
    pub max_rows: Option<usize>,

    /// Maximum characters per cell
    pub max_col_width: Option<usize>,

    /// Whether to append a `[R rows x C columns]` footer
    pub show_dimensions: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self {
            max_rows: Some(20),
            max_col_width: Some(25),
            show_dimensions: true,
        }
    }
}

impl TableFormatter {
    /// Render a table into a string
    pub fn render(&self, table: &Table) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write(table, &mut out);
        out
    }

    /// Render a table into a writer
    pub fn write<W: fmt::Write>(&self, table: &Table, out: &mut W) -> fmt::Result {
        if table.num_columns() == 0 {
            writeln!(out, "Empty Table")?;
            writeln!(out, "Columns: []")?;
            return writeln!(out, "Index: []");
        }

        let row_indices = self.visible_rows(table.num_rows());

        let header: Vec<String> = std::iter::once(String::new())
            .chain(table.columns().iter().map(|c| self.cell(c.name())))
            .collect();

        let mut lines: Vec<Vec<String>> = Vec::with_capacity(row_indices.len() + 1);
        lines.push(header);
        for index in &row_indices {
            let line = match index {
                Some(i) => std::iter::once(i.to_string())
                    .chain(table.columns().iter().map(|c| self.cell(&c.values()[*i].to_string())))
                    .collect(),
                None => vec!["...".to_string(); table.num_columns() + 1],
            };
            lines.push(line);
        }

        let widths: Vec<usize> = (0..=table.num_columns())
            .map(|col| lines.iter().map(|l| l[col].chars().count()).max().unwrap_or(0))
            .collect();

        for line in &lines {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, width))| {
                    if col == 0 {
                        format!("{cell:<width$}")
                    } else {
                        format!("{cell:>width$}")
                    }
                })
                .collect();
            writeln!(out, "{}", cells.join("  ").trim_end())?;
        }

        if self.show_dimensions {
            writeln!(out)?;
            writeln!(out, "[{} rows x {} columns]", table.num_rows(), table.num_columns())?;
        }

        Ok(())
    }

    /// Row indices to render, `None` marking the elided middle
    fn visible_rows(&self, total: usize) -> Vec<Option<usize>> {
        match self.max_rows {
            Some(max) if total > max => {
                let tail = max / 2;
                let head = max - tail;
                (0..head)
                    .map(Some)
                    .chain(std::iter::once(None))
                    .chain((total - tail..total).map(Some))
                    .collect()
            }
            _ => (0..total).map(Some).collect(),
        }
    }

    fn cell(&self, text: &str) -> String {
        match self.max_col_width {
            Some(max) if text.chars().count() > max && max > 3 => {
                let kept: String = text.chars().take(max - 3).collect();
                format!("{kept}...")
            }
            _ => text.to_string(),
        }
    }
}
