//! JSON document writing

use std::io::Write;

use serde_json::{Map, Number, Value as JsonValue};
use tabkit_core::column::{DATE_FORMAT, TIMESTAMP_FORMAT};
use tabkit_core::{Table, Value};

use crate::error::Result;

use super::JsonOrientation;

/// Convert one cell to a JSON value
///
/// Dates and timestamps become strings and non-finite floats become null.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Int64(i) => JsonValue::Number((*i).into()),
        Value::Float64(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Date(d) => JsonValue::String(d.format(DATE_FORMAT).to_string()),
        Value::Timestamp(t) => JsonValue::String(t.format(TIMESTAMP_FORMAT).to_string()),
    }
}

/// Build the JSON document for a table
pub fn table_to_json(table: &Table, orientation: JsonOrientation) -> JsonValue {
    match orientation {
        JsonOrientation::Records => JsonValue::Array(
            table
                .rows()
                .map(|row| {
                    table
                        .column_names()
                        .into_iter()
                        .zip(row)
                        .map(|(name, value)| (name.to_string(), value_to_json(value)))
                        .collect::<Map<_, _>>()
                })
                .map(JsonValue::Object)
                .collect(),
        ),
        JsonOrientation::Columns => JsonValue::Object(
            table
                .columns()
                .iter()
                .map(|column| {
                    let values = column.values().iter().map(value_to_json).collect();
                    (column.name().to_string(), JsonValue::Array(values))
                })
                .collect(),
        ),
    }
}

/// Write a table as one JSON document
pub fn write_document<W: Write>(table: &Table, orientation: JsonOrientation, pretty: bool, writer: W) -> Result<()> {
    let document = table_to_json(table, orientation);
    if pretty {
        serde_json::to_writer_pretty(writer, &document)?;
    } else {
        serde_json::to_writer(writer, &document)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Table {
        Table::from_rows(
            &["id", "score", "day"],
            vec![
                vec![1.into(), 0.5.into(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().into()],
                vec![2.into(), f64::NAN.into(), Value::Null],
            ],
        )
        .unwrap()
    }

    fn render(orientation: JsonOrientation) -> String {
        let mut out = Vec::new();
        write_document(&sample(), orientation, false, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_records_orientation() {
        assert_eq!(
            render(JsonOrientation::Records),
            r#"[{"id":1,"score":0.5,"day":"2024-01-02"},{"id":2,"score":null,"day":null}]"#
        );
    }

    #[test]
    fn test_columns_orientation() {
        assert_eq!(
            render(JsonOrientation::Columns),
            r#"{"id":[1,2],"score":[0.5,null],"day":["2024-01-02",null]}"#
        );
    }

    #[test]
    fn test_empty_table() {
        let mut out = Vec::new();
        write_document(&Table::empty(), JsonOrientation::Records, false, &mut out).unwrap();
        assert_eq!(out, b"[]");
    }
}
