//! Source loading, cell type inference and text formatting shared by the backends

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tabkit_core::column::{DATE_FORMAT, TIMESTAMP_FORMAT};
use tabkit_core::{Column, DataType, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// Alternative timestamp layout accepted on read
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Cell texts that mark a missing value
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA",
    "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Check if a cell is empty or holds one of the [`MISSING_MARKERS`]
pub fn is_missing(text: &str) -> bool {
    text.is_empty() || MISSING_MARKERS.contains(&text)
}

/// Read the whole source at `path`
///
/// A file that is empty or holds only whitespace is reported as
/// [`Error::NoData`]; a missing file surfaces as [`Error::Io`].
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::NoData(format!("{} is empty", path.display())));
    }

    debug!(path = %path.display(), bytes = bytes.len(), "Read source");
    Ok(bytes)
}

/// Make header names usable as column names
///
/// Empty names become `Unnamed: {index}` and repeats get a `.1`, `.2`, ...
/// suffix in order of appearance.
pub fn normalize_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let headers: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.as_ref();
            if h.is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut names = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{header}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// Floats only; `NaN` and `inf` spellings stay text
fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, ISO_TIMESTAMP_FORMAT))
        .ok()
}

/// Parse every present cell with `parse`, or give up on the first failure
fn parse_all<T, F>(cells: &[Option<String>], parse: F) -> Option<Vec<Value>>
where
    F: Fn(&str) -> Option<T>,
    T: Into<Value>,
{
    cells
        .iter()
        .map(|cell| match cell {
            None => Some(Value::Null),
            Some(text) => parse(text).map(Into::into),
        })
        .collect()
}

/// Build a typed column from text cells, `None` marking an empty cell
///
/// The first type that parses every present cell wins, tried in the order
/// Int64, Float64 (finite values only), Boolean, Date, Timestamp; otherwise
/// the column is text.
/// A column with no present cells is `Null`-typed.
pub fn column_from_text(name: &str, cells: Vec<Option<String>>) -> Column {
    if cells.iter().all(Option::is_none) {
        return Column::nulls(name, cells.len());
    }

    let typed = parse_all(&cells, |s| s.parse::<i64>().ok())
        .map(|values| (DataType::Int64, values))
        .or_else(|| parse_all(&cells, parse_finite).map(|values| (DataType::Float64, values)))
        .or_else(|| parse_all(&cells, parse_bool).map(|values| (DataType::Boolean, values)))
        .or_else(|| parse_all(&cells, parse_date).map(|values| (DataType::Date, values)))
        .or_else(|| parse_all(&cells, parse_timestamp).map(|values| (DataType::Timestamp, values)));

    if let Some((data_type, values)) = typed {
        if let Ok(column) = Column::with_type(name, data_type, values) {
            return column;
        }
    }

    let values = cells.into_iter().map(Value::from).collect();
    Column::from_mixed(name, values)
}

/// Promote a text column to `Date` or `Timestamp` when every value parses as one
///
/// Columns of any other type are returned unchanged.
pub fn infer_temporal(column: Column) -> Column {
    if column.data_type() != DataType::String {
        return column;
    }

    let cells: Vec<Option<String>> = column
        .values()
        .iter()
        .map(|v| match v {
            Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();

    let promoted = parse_all(&cells, parse_date)
        .map(|values| (DataType::Date, values))
        .or_else(|| parse_all(&cells, parse_timestamp).map(|values| (DataType::Timestamp, values)));

    match promoted {
        Some((data_type, values)) => Column::with_type(column.name(), data_type, values).unwrap_or(column),
        None => column,
    }
}

/// Render a value as a text cell
///
/// Nulls become empty cells and floats always keep a decimal point or an
/// exponent, so the cell reads back with the same type.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float64(v) => format!("{v:?}"),
        other => other.to_string(),
    }
}
