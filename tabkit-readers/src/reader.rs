//! Single-shot readers that load a table once on construction

use std::fmt;

use tabkit_core::{Table, TableFormatter};

/// A loaded, read-only table together with where it came from
///
/// Constructors perform exactly one fetch; there is no re-read. The
/// `Display` impl renders the table with the default [`TableFormatter`].
pub trait Reader: fmt::Display {
    /// Name of the backend that produced the table
    fn backend(&self) -> &'static str;

    /// Human-readable description of the source
    fn location(&self) -> String;

    /// The loaded table
    fn data(&self) -> &Table;

    /// Take ownership of the loaded table
    fn into_data(self: Box<Self>) -> Table;
}

/// Render a reader's table for `Display`
pub(crate) fn render(table: &Table, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    TableFormatter::default().write(table, f)
}
