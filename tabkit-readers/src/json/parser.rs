//! JSON document parsing into tables

use std::collections::HashMap;

use serde_json::{Map, Value as JsonValue};
use tabkit_core::{Column, Table, Value};

use crate::common::infer_temporal;
use crate::error::{Error, Result};

/// Convert one JSON value to a cell
///
/// Integral numbers become `Int64`, other numbers `Float64`, and nested
/// arrays or objects are kept as their JSON text.
pub fn json_to_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map_or(Value::Null, Value::Float64),
        },
        JsonValue::String(s) => Value::String(s),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => Value::String(nested.to_string()),
    }
}

fn build_column(name: &str, values: Vec<JsonValue>) -> Column {
    let values = values.into_iter().map(json_to_value).collect();
    infer_temporal(Column::from_mixed(name, values))
}

fn layout_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Parse a JSON document into a table
///
/// Accepted layouts are an array of objects (one object per row), an object
/// of equally long arrays (one array per column) and an object of objects
/// (one object per column, keyed by row label).
pub fn parse_document(bytes: &[u8]) -> Result<Table> {
    let document: JsonValue = serde_json::from_slice(bytes)?;

    match document {
        JsonValue::Array(rows) => parse_records(rows),
        JsonValue::Object(columns) => parse_columns(columns),
        other => Err(Error::Format(format!(
            "expected a JSON array or object at the top level, found {}",
            layout_name(&other)
        ))),
    }
}

fn parse_records(rows: Vec<JsonValue>) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<JsonValue>> = Vec::new();

    for (row_idx, row) in rows.into_iter().enumerate() {
        let fields = match row {
            JsonValue::Object(fields) => fields,
            other => {
                return Err(Error::Format(format!(
                    "record {} is a JSON {}, expected an object",
                    row_idx,
                    layout_name(&other)
                )))
            }
        };

        for (key, value) in fields {
            let position = match positions.get(&key) {
                Some(&position) => position,
                None => {
                    positions.insert(key.clone(), names.len());
                    names.push(key);
                    columns.push(vec![JsonValue::Null; row_idx]);
                    columns.len() - 1
                }
            };
            columns[position].push(value);
        }

        for column in &mut columns {
            if column.len() <= row_idx {
                column.push(JsonValue::Null);
            }
        }
    }

    let columns = names
        .iter()
        .zip(columns)
        .map(|(name, values)| build_column(name, values))
        .collect();

    Ok(Table::new(columns)?)
}

fn parse_columns(columns: Map<String, JsonValue>) -> Result<Table> {
    if columns.values().all(JsonValue::is_array) {
        let columns = columns
            .into_iter()
            .map(|(name, values)| match values {
                JsonValue::Array(values) => build_column(&name, values),
                _ => Column::nulls(&name, 0),
            })
            .collect();

        return Table::new(columns).map_err(|e| Error::Format(format!("column arrays differ in length: {e}")));
    }

    if columns.values().all(JsonValue::is_object) {
        return parse_indexed_columns(columns);
    }

    Err(Error::Format(
        "object values must be all arrays or all objects".to_string(),
    ))
}

fn parse_indexed_columns(columns: Map<String, JsonValue>) -> Result<Table> {
    let mut labels: Vec<String> = Vec::new();
    for cells in columns.values() {
        if let JsonValue::Object(cells) = cells {
            for label in cells.keys() {
                if !labels.contains(label) {
                    labels.push(label.clone());
                }
            }
        }
    }

    let columns = columns
        .into_iter()
        .map(|(name, cells)| {
            let JsonValue::Object(mut cells) = cells else {
                return Column::nulls(&name, labels.len());
            };
            let values = labels
                .iter()
                .map(|label| cells.remove(label).unwrap_or(JsonValue::Null))
                .collect();
            build_column(&name, values)
        })
        .collect();

    Ok(Table::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tabkit_core::DataType;
    use test_case::test_case;

    fn expected() -> Table {
        Table::from_rows(
            &["col1", "col2", "col3"],
            vec![
                vec![1.into(), 2.into(), 3.into()],
                vec![4.into(), 5.into(), 6.into()],
            ],
        )
        .unwrap()
    }

    #[test_case(r#"[{"col1":1,"col2":2,"col3":3},{"col1":4,"col2":5,"col3":6}]"#; "records")]
    #[test_case(r#"{"col1":[1,4],"col2":[2,5],"col3":[3,6]}"#; "columns")]
    #[test_case(r#"{"col1":{"0":1,"1":4},"col2":{"0":2,"1":5},"col3":{"0":3,"1":6}}"#; "index keyed")]
    fn test_layouts(document: &str) {
        assert_eq!(parse_document(document.as_bytes()).unwrap(), expected());
    }

    #[test_case("[]"; "empty array")]
    #[test_case("{}"; "empty object")]
    fn test_empty_documents(document: &str) {
        let table = parse_document(document.as_bytes()).unwrap();
        assert_eq!(table.shape(), (0, 0));
    }

    #[test_case("42"; "number")]
    #[test_case("[1, 2]"; "array of scalars")]
    #[test_case(r#"{"a": [1], "b": 2}"#; "mixed object")]
    #[test_case(r#"{"a": [1, 2], "b": [3]}"#; "ragged columns")]
    fn test_unsupported_layouts(document: &str) {
        let err = parse_document(document.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format(_)), "{err}");
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_document(b"[{\"a\": 1,}").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_records_with_missing_keys() {
        let table = parse_document(br#"[{"a": 1}, {"b": "x"}, {"a": 3, "b": "z"}]"#).unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row(0).unwrap(), vec![Value::Int64(1), Value::Null]);
        assert_eq!(table.row(1).unwrap(), vec![Value::Null, Value::from("x")]);
    }

    #[test]
    fn test_value_mapping() {
        let table = parse_document(
            br#"[{"n": 1, "f": 1.5, "b": true, "d": "2024-02-29", "nested": {"k": [1]}},
                 {"n": 2, "f": 2, "b": false, "d": null, "nested": null}]"#,
        )
        .unwrap();

        assert_eq!(
            table.schema().data_types(),
            vec![
                DataType::Int64,
                DataType::Float64,
                DataType::Boolean,
                DataType::Date,
                DataType::String
            ]
        );
        assert_eq!(
            table.row(0).unwrap()[3],
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(table.row(0).unwrap()[4], Value::from(r#"{"k":[1]}"#));
    }

    #[test]
    fn test_mixed_types_fall_back_to_text() {
        let table = parse_document(br#"{"v": [1, "one", true]}"#).unwrap();
        let column = table.column(0).unwrap();

        assert_eq!(column.data_type(), DataType::String);
        assert_eq!(column.values()[2], Value::from("True"));
    }
}
