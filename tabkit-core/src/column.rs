//! Column implementation for storing typed vectors of values

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::schema::DataType;

/// Format used when rendering timestamps as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format used when rendering dates as text
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value
    Int64(i64),

    /// Floating point value
    Float64(f64),

    /// Text value
    String(String),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time of day
    Timestamp(NaiveDateTime),
}

impl Value {
    /// The data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::String(_) => DataType::String,
            Value::Date(_) => DataType::Date,
            Value::Timestamp(_) => DataType::Timestamp,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert this value to the given type, if the conversion is lossless
    fn cast(self, data_type: DataType) -> Option<Value> {
        match (self, data_type) {
            (Value::Null, _) => Some(Value::Null),
            #[allow(clippy::cast_precision_loss)]
            (Value::Int64(v), DataType::Float64) => Some(Value::Float64(v as f64)),
            (value, target) if value.data_type() == target => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NaN"),
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
            Value::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A named column of values sharing one data type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Name of the column
    name: String,

    /// Data type of the column
    data_type: DataType,

    /// Values, `Value::Null` for missing entries
    values: Vec<Value>,

    /// Count of null values in this column
    null_count: usize,
}

impl Column {
    /// Create a column, inferring its type from the values
    ///
    /// Integers mixed with floats are promoted to floats; any other mix of
    /// non-null types is a [`Error::TypeMismatch`].
    pub fn new(name: &str, values: Vec<Value>) -> Result<Self> {
        let mut data_type = DataType::Null;
        for value in &values {
            data_type = data_type.unify(value.data_type()).ok_or_else(|| {
                Error::TypeMismatch(format!(
                    "column '{}' mixes {} and {} values",
                    name,
                    data_type,
                    value.data_type()
                ))
            })?;
        }

        Self::with_type(name, data_type, values)
    }

    /// Create a column of the given type
    ///
    /// Every value must be null or of `data_type`; integers are accepted into
    /// `Float64` columns.
    pub fn with_type(name: &str, data_type: DataType, values: Vec<Value>) -> Result<Self> {
        let values = values
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let found = value.data_type();
                value.cast(data_type).ok_or_else(|| {
                    Error::TypeMismatch(format!(
                        "column '{name}' expects {data_type}, found {found} at row {row}"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let null_count = values.iter().filter(|v| v.is_null()).count();

        Ok(Self {
            name: name.to_string(),
            data_type,
            values,
            null_count,
        })
    }

    /// Create a column from values of possibly incompatible types
    ///
    /// Falls back to a `String` column of each value's text form when the
    /// values do not unify.
    pub fn from_mixed(name: &str, values: Vec<Value>) -> Self {
        match Self::new(name, values.clone()) {
            Ok(column) => column,
            Err(_) => {
                let text = values
                    .into_iter()
                    .map(|v| match v {
                        Value::Null => Value::Null,
                        Value::String(s) => Value::String(s),
                        other => Value::String(other.to_string()),
                    })
                    .collect::<Vec<_>>();
                let null_count = text.iter().filter(|v| v.is_null()).count();

                Self {
                    name: name.to_string(),
                    data_type: DataType::String,
                    values: text,
                    null_count,
                }
            }
        }
    }

    /// Create a column repeating one value
    pub fn repeat(name: &str, value: Value, len: usize) -> Self {
        let null_count = if value.is_null() { len } else { 0 };

        Self {
            name: name.to_string(),
            data_type: value.data_type(),
            values: vec![value; len],
            null_count,
        }
    }

    /// Create a column of nulls
    pub fn nulls(name: &str, len: usize) -> Self {
        Self::repeat(name, Value::Null, len)
    }

    /// Get the name of this column
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the data type of this column
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Get the values of this column
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the value at an index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get the number of values in this column
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if this column is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the number of null values
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Check if this column holds at least one value and every value is null
    pub fn is_all_null(&self) -> bool {
        !self.values.is_empty() && self.null_count == self.values.len()
    }

    /// Copy of the first `n` values
    pub fn head(&self, n: usize) -> Self {
        let values: Vec<Value> = self.values.iter().take(n).cloned().collect();
        let null_count = values.iter().filter(|v| v.is_null()).count();

        Self {
            name: self.name.clone(),
            data_type: self.data_type,
            values,
            null_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_inference() {
        let column = Column::new("a", vec![1.into(), Value::Null, 3.into()]).unwrap();
        assert_eq!(column.data_type(), DataType::Int64);
        assert_eq!(column.len(), 3);
        assert_eq!(column.null_count(), 1);
        assert!(!column.is_all_null());
    }

    #[test]
    fn test_int_promoted_to_float() {
        let column = Column::new("a", vec![1.into(), 2.5.into()]).unwrap();
        assert_eq!(column.data_type(), DataType::Float64);
        assert_eq!(column.values(), &[Value::Float64(1.0), Value::Float64(2.5)]);
    }

    #[test]
    fn test_mixed_types_rejected() {
        let err = Column::new("a", vec![1.into(), "x".into()]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));
    }

    #[test]
    fn test_from_mixed_falls_back_to_text() {
        let column = Column::from_mixed("a", vec![1.into(), "x".into(), true.into(), Value::Null]);
        assert_eq!(column.data_type(), DataType::String);
        assert_eq!(
            column.values(),
            &[
                Value::String("1".into()),
                Value::String("x".into()),
                Value::String("True".into()),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_with_type_rejects_foreign_values() {
        let err = Column::with_type("a", DataType::Date, vec!["2023-06-01".into()]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));
    }

    #[test]
    fn test_all_null() {
        assert_eq!(Column::nulls("c", 3).data_type(), DataType::Null);
        assert!(Column::nulls("c", 3).is_all_null());
        assert!(!Column::nulls("c", 0).is_all_null());
    }

    #[test]
    fn test_head() {
        let column = Column::new("a", (0..10).map(Value::from).collect()).unwrap();
        let head = column.head(3);
        assert_eq!(head.len(), 3);
        assert_eq!(head.get(2), Some(&Value::Int64(2)));
        assert_eq!(column.head(20).len(), 10);
    }
}
