//! Schema definition for table columns

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Data type for column values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Only null values
    Null,

    /// Boolean
    Boolean,

    /// 64-bit signed integer
    Int64,

    /// 64-bit floating point
    Float64,

    /// UTF-8 encoded string
    String,

    /// Calendar date
    Date,

    /// Date and time of day without timezone
    Timestamp,
}

impl DataType {
    /// Find the narrowest type able to hold values of both types
    ///
    /// Returns `None` if the types are incompatible.
    pub fn unify(self, other: DataType) -> Option<DataType> {
        match (self, other) {
            (a, b) if a == b => Some(a),

            // Anything is compatible with Null
            (DataType::Null, t) | (t, DataType::Null) => Some(t),

            // Integers are promoted
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                Some(DataType::Float64)
            }

            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "Null",
            DataType::Boolean => "Boolean",
            DataType::Int64 => "Int64",
            DataType::Float64 => "Float64",
            DataType::String => "String",
            DataType::Date => "Date",
            DataType::Timestamp => "Timestamp",
        };
        f.write_str(name)
    }
}

/// A field in a schema, with a name, data type, and nullability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Name of the field
    pub name: String,

    /// Data type of the field
    pub data_type: DataType,

    /// Whether the column holds at least one null
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: &str, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            nullable,
        }
    }

    /// Get the name of this field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the data type of this field
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Check if this field is nullable
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}: {} (nullable)", self.name, self.data_type)
        } else {
            write!(f, "{}: {}", self.name, self.data_type)
        }
    }
}

/// A schema describing a table's columns
///
/// Serializes as the plain list of fields; the name index is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    /// Fields in this schema
    fields: Vec<Field>,

    /// Field indices by name for faster lookup
    field_indices: HashMap<String, usize>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        let field_indices = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.clone(), i))
            .collect();

        Self {
            fields,
            field_indices,
        }
    }

    /// Get all fields in this schema
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by index
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Get a field by name
    pub fn field_by_name(&self, name: &str) -> Result<&Field> {
        let index = self.index_of(name)?;
        Ok(&self.fields[index])
    }

    /// Get the index of a field by name
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.field_indices
            .get(name)
            .copied()
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Get the number of fields in this schema
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if this schema is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Data types in field order
    pub fn data_types(&self) -> Vec<DataType> {
        self.fields.iter().map(Field::data_type).collect()
    }
}

impl From<Vec<Field>> for Schema {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema: {} fields", self.fields.len())?;
        for field in &self.fields {
            writeln!(f, "  {field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(DataType::Int64, DataType::Int64 => Some(DataType::Int64); "same type")]
    #[test_case(DataType::Null, DataType::Date => Some(DataType::Date); "null left")]
    #[test_case(DataType::String, DataType::Null => Some(DataType::String); "null right")]
    #[test_case(DataType::Int64, DataType::Float64 => Some(DataType::Float64); "int promoted")]
    #[test_case(DataType::Date, DataType::Timestamp => None; "dates stay apart")]
    #[test_case(DataType::Boolean, DataType::Int64 => None; "bool and int")]
    fn test_unify(a: DataType, b: DataType) -> Option<DataType> {
        a.unify(b)
    }

    #[test]
    fn test_schema_serde_rebuilds_index() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("day", DataType::Date, true),
        ]);

        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);

        let loaded: Schema = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, schema);
        assert_eq!(loaded.index_of("day").unwrap(), 1);
        assert!(loaded.field_by_name("day").unwrap().is_nullable());
        assert!(matches!(loaded.index_of("missing"), Err(Error::ColumnNotFound(_))));
    }

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::String, true),
        ]);

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index_of("name").unwrap(), 1);
        assert_eq!(schema.field_by_name("id").unwrap().data_type(), DataType::Int64);
        assert!(matches!(schema.index_of("missing"), Err(Error::ColumnNotFound(_))));
        assert!(schema.field(5).is_none());
    }

    #[test]
    fn test_schema_display() {
        let schema = Schema::new(vec![Field::new("amount", DataType::Float64, true)]);
        assert_eq!(schema.to_string(), "Schema: 1 fields\n  amount: Float64 (nullable)\n");
    }
}
