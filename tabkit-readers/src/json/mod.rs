//! Record-oriented JSON backend

mod parser;
mod reader;
mod writer;

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tabkit_core::Table;

use crate::error::Result;
use crate::format::{FileDataset, TableFormat};

pub use parser::{json_to_value, parse_document};
pub use reader::JsonReader;
pub use writer::{table_to_json, value_to_json, write_document};

/// Layout of a written JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonOrientation {
    /// An array with one object per row
    #[default]
    Records,

    /// An object with one array per column
    Columns,
}

/// JSON serialization settings
///
/// Reading accepts every supported layout regardless of `orientation`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct JsonFormat {
    /// Layout used when writing
    pub orientation: JsonOrientation,

    /// Whether to indent written documents
    pub pretty: bool,
}

impl TableFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Table> {
        parse_document(bytes)
    }

    fn encode<W: Write>(&self, table: &Table, writer: W) -> Result<()> {
        write_document(table, self.orientation, self.pretty, writer)
    }
}

/// A dataset stored as a JSON file
pub type JsonDataset = FileDataset<JsonFormat>;

impl FileDataset<JsonFormat> {
    /// Open a JSON dataset that writes records
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_format(path, JsonFormat::default())
    }
}
