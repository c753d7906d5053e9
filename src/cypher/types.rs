//! Wire types for the Cypher endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{NeoError, Result};
use crate::record::Record;

/// Request body sent to the Cypher endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct CypherRequest<'a> {
    pub query: &'a str,
    pub params: &'a Map<String, Value>,
}

/// The column/row result set returned by a Cypher query.
///
/// Every row holds exactly one value per column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    columns: Vec<String>,

    #[serde(default)]
    data: Vec<Vec<Value>>,
}

impl RawResult {
    /// Creates a result set, checking that every row matches the columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let result = Self {
            columns,
            data: rows,
        };
        result.validate()?;
        Ok(result)
    }

    /// Decodes a response body of the form `{"columns": [...], "data": [[...]]}`.
    pub fn from_body(body: Value) -> Result<Self> {
        let result: RawResult = serde_json::from_value(body)
            .map_err(|e| NeoError::decode(format!("malformed Cypher result: {}", e)))?;
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> Result<()> {
        let width = self.columns.len();
        match self.data.iter().position(|row| row.len() != width) {
            Some(row_num) => Err(NeoError::decode(format!(
                "row {} has {} values, expected {}",
                row_num,
                self.data[row_num].len(),
                width
            ))),
            None => Ok(()),
        }
    }

    /// Column names, in the order the query returned them.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows of undecoded values.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pivots each row into an object keyed by column name.
    pub fn to_maps(&self) -> Vec<Map<String, Value>> {
        self.data
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Decodes rows with serde, matching fields to columns by their
    /// (possibly `#[serde(rename)]`d) names.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.to_maps()
            .into_iter()
            .enumerate()
            .map(|(row_num, map)| {
                serde_json::from_value(Value::Object(map))
                    .map_err(|e| NeoError::decode(format!("row {}: {}", row_num, e)))
            })
            .collect()
    }

    /// Decodes rows through the record type's declared column mapping.
    pub fn decode<R: Record>(&self) -> Result<Vec<R>> {
        R::mapping().decode(self)
    }
}
