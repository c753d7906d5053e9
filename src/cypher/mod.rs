//! Cypher query execution.
//!
//! A [`CypherQuery`] carries a statement, its named parameters and an
//! optional destination. [`Database::cypher`] posts it to the server's Cypher
//! endpoint, keeps the column/row result on the query and, when a
//! destination is attached, decodes the rows into it.

mod types;

pub use types::RawResult;

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{NeoError, Result, ServerError};
use crate::record::{Destination, Record};
use types::CypherRequest;

/// A Cypher statement with parameters and, once executed, its result.
pub struct CypherQuery<'a> {
    /// Statement text.
    pub statement: String,

    /// Named parameters, serialized in insertion order.
    pub parameters: Map<String, Value>,

    destination: Option<&'a mut dyn Destination>,
    result: RawResult,
}

impl<'a> CypherQuery<'a> {
    /// Creates a query with no parameters.
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            parameters: Map::new(),
            destination: None,
            result: RawResult::default(),
        }
    }

    /// Adds a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds a parameter from any serializable value.
    pub fn try_param<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(|e| {
            NeoError::decode(format!("parameter could not be serialized: {}", e))
        })?;
        self.parameters.insert(name.into(), value);
        Ok(self)
    }

    /// Replaces all parameters.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.parameters = params;
        self
    }

    /// Attaches a destination that is filled on every successful execution.
    pub fn into_destination(mut self, destination: &'a mut dyn Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Returns true if a destination is attached.
    pub fn has_destination(&self) -> bool {
        self.destination.is_some()
    }

    /// Column names of the last successful execution; empty before that.
    pub fn columns(&self) -> &[String] {
        self.result.columns()
    }

    /// Raw result of the last successful execution.
    pub fn result(&self) -> &RawResult {
        &self.result
    }

    /// Decodes the stored result through `R`'s column mapping.
    pub fn unmarshal<R: Record>(&self) -> Result<Vec<R>> {
        self.result.decode()
    }

    /// Decodes the stored result into `dest`, replacing its contents.
    pub fn unmarshal_into<R: Record + Send>(&self, dest: &mut Vec<R>) -> Result<()> {
        dest.fill(&self.result)
    }

    /// Decodes the stored result with serde, keyed by column name.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.result.deserialize()
    }

    fn request_body(&self) -> Result<Value> {
        Ok(serde_json::to_value(CypherRequest {
            query: &self.statement,
            params: &self.parameters,
        })?)
    }
}

impl fmt::Debug for CypherQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CypherQuery")
            .field("statement", &self.statement)
            .field("parameters", &self.parameters)
            .field("has_destination", &self.destination.is_some())
            .field("result", &self.result)
            .finish()
    }
}

impl Database {
    /// Executes a Cypher query.
    ///
    /// On success the query's result is replaced and, if a destination is
    /// attached, refilled. On any failure both are left as they were.
    pub async fn cypher(&self, query: &mut CypherQuery<'_>) -> Result<()> {
        let url = self.href_cypher();
        let body = query.request_body()?;
        debug!(
            "Cypher: {} ({} params)",
            query.statement.trim(),
            query.parameters.len()
        );

        let response = self.transport().post_json(url, &body).await?;

        if response.status != 200 {
            let server = ServerError::from_body(&response.body);
            warn!(
                uri = url,
                status = response.status,
                request = %body,
                response = %response.body,
                "Cypher query failed"
            );
            return Err(NeoError::bad_response(url, response.status, server));
        }

        let result = RawResult::from_body(response.body.clone()).map_err(|e| {
            warn!(
                uri = url,
                response = %response.body,
                error = %e,
                "Cypher result could not be decoded"
            );
            e
        })?;

        if let Some(destination) = query.destination.as_deref_mut() {
            destination.fill(&result).map_err(|e| {
                warn!(
                    uri = url,
                    columns = ?result.columns(),
                    error = %e,
                    "Cypher rows do not fit the destination"
                );
                e
            })?;
        }

        debug!("Cypher returned {} rows", result.len());
        query.result = result;
        Ok(())
    }
}
