//! CSV parser for converting text records to typed columns

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tabkit_core::Table;

use crate::common::{column_from_text, is_missing, normalize_headers};
use crate::error::{Error, Result};

/// Options for reading CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvReaderOptions {
    /// Whether the first record holds the column names
    pub has_header: bool,

    /// Delimiter character
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Comment character
    pub comment: Option<u8>,

    /// Whether to trim whitespace around fields
    pub trim: bool,

    /// Whether cells matching [`MISSING_MARKERS`](crate::common::MISSING_MARKERS) read as null
    ///
    /// Empty cells are always null.
    pub missing_markers: bool,
}

impl Default for CsvReaderOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            comment: None,
            trim: false,
            missing_markers: true,
        }
    }
}

/// CSV parser that builds a whole table from a document
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    /// Reader options
    options: CsvReaderOptions,
}

impl CsvParser {
    /// Create a new CSV parser
    pub fn new(options: CsvReaderOptions) -> Self {
        Self { options }
    }

    /// Parse a complete CSV document
    ///
    /// Every record must have as many fields as the header (or, without a
    /// header, as the first record).
    pub fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .comment(self.options.comment)
            .trim(if self.options.trim { csv::Trim::All } else { csv::Trim::None })
            .has_headers(self.options.has_header)
            .flexible(false)
            .from_reader(bytes);

        let mut headers = if self.options.has_header {
            Some(normalize_headers(reader.headers()?.iter()))
        } else {
            None
        };

        let mut cells: Vec<Vec<Option<String>>> = headers
            .as_ref()
            .map(|h| vec![Vec::new(); h.len()])
            .unwrap_or_default();

        for result in reader.records() {
            let record = result?;

            if headers.is_none() {
                headers = Some((0..record.len()).map(|i| format!("column_{i}")).collect());
                cells = vec![Vec::new(); record.len()];
            }

            for (column, field) in cells.iter_mut().zip(record.iter()) {
                let missing = if self.options.missing_markers {
                    is_missing(field)
                } else {
                    field.is_empty()
                };
                column.push(if missing { None } else { Some(field.to_string()) });
            }
        }

        let Some(headers) = headers else {
            return Err(Error::NoData("CSV document has no records".to_string()));
        };

        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| column_from_text(name, values))
            .collect();

        Ok(Table::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabkit_core::{DataType, Value};

    #[test]
    fn test_parse_basic() {
        let table = CsvParser::default()
            .parse(b"id,name,value\n1,Alice,10.5\n2,Bob,20.1\n3,Charlie,\n")
            .unwrap();

        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.column_names(), vec!["id", "name", "value"]);
        assert_eq!(
            table.schema().data_types(),
            vec![DataType::Int64, DataType::String, DataType::Float64]
        );
        assert_eq!(table.row(2).unwrap()[2], Value::Null);
    }

    #[test]
    fn test_parse_without_header() {
        let parser = CsvParser::new(CsvReaderOptions {
            has_header: false,
            ..Default::default()
        });
        let table = parser.parse(b"1,a\n2,b\n").unwrap();

        assert_eq!(table.column_names(), vec!["column_0", "column_1"]);
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn test_header_only_keeps_columns() {
        let table = CsvParser::default().parse(b"a,b,c\n").unwrap();
        assert_eq!(table.shape(), (0, 3));
        assert!(table.columns().iter().all(|c| c.data_type() == DataType::Null));
    }

    #[test]
    fn test_ragged_rows_fail() {
        let err = CsvParser::default().parse(b"a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_quoted_fields() {
        let table = CsvParser::default()
            .parse(b"name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n")
            .unwrap();
        assert_eq!(table.row(0).unwrap(), vec![Value::from("Smith, J"), Value::from("said \"hi\"")]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let parser = CsvParser::new(CsvReaderOptions {
            delimiter: b';',
            ..Default::default()
        });
        let table = parser.parse(b"a;b\n1;true\n").unwrap();
        assert_eq!(table.row(0).unwrap(), vec![Value::Int64(1), Value::Boolean(true)]);
    }

    #[test]
    fn test_missing_markers_read_as_null() {
        let table = CsvParser::default()
            .parse(b"id,score,first\n1,NaN,Nan\n2,nan,Inf\n3,NA,\n")
            .unwrap();

        assert_eq!(
            table.schema().data_types(),
            vec![DataType::Int64, DataType::Null, DataType::String]
        );
        assert_eq!(table.column_by_name("score").unwrap().null_count(), 3);
        assert_eq!(table.column_by_name("first").unwrap().values()[1], Value::from("Inf"));
    }

    #[test]
    fn test_missing_markers_can_be_kept() {
        let parser = CsvParser::new(CsvReaderOptions {
            missing_markers: false,
            ..Default::default()
        });
        let table = parser.parse(b"code\nNA\nnull\n").unwrap();

        assert_eq!(table.column_by_name("code").unwrap().data_type(), DataType::String);
        assert_eq!(table.row(0).unwrap(), vec![Value::from("NA")]);
    }
}
