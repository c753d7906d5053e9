//! Database handle for neocypher.
//!
//! A [`Database`] is created by fetching the server's service root, which
//! advertises the URLs of every REST endpoint. Queries are then sent to
//! those URLs through a shared [`Transport`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ConnectionConfig;
use crate::error::{NeoError, Result, ServerError};
use crate::transport::{HttpTransport, Transport};

/// Endpoint URLs advertised by the service root (`GET /db/data/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRoot {
    #[serde(default)]
    pub node: String,

    #[serde(default)]
    pub node_index: String,

    #[serde(default)]
    pub relationship_index: String,

    #[serde(default)]
    pub relationship_types: String,

    #[serde(default)]
    pub batch: String,

    #[serde(default)]
    pub cypher: String,

    #[serde(default)]
    pub transaction: String,

    #[serde(default)]
    pub extensions_info: String,

    #[serde(default)]
    pub extensions: Map<String, Value>,

    #[serde(default)]
    pub neo4j_version: String,
}

/// A connection to a Neo4j server's REST API.
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct Database {
    base_url: String,
    root: ServiceRoot,
    transport: Arc<dyn Transport>,
}

impl Database {
    /// Connects over HTTP using the given connection settings.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Self::with_transport(&config.url(), Arc::new(transport)).await
    }

    /// Connects to `base_url` through an arbitrary transport.
    pub async fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let response = transport.get(base_url).await?;

        if response.status != 200 {
            warn!(
                uri = base_url,
                status = response.status,
                response = %response.body,
                "Service root request failed"
            );
            let server = ServerError::from_body(&response.body);
            return Err(NeoError::bad_response(base_url, response.status, server));
        }

        let root: ServiceRoot = serde_json::from_value(response.body.clone()).map_err(|e| {
            warn!(
                uri = base_url,
                response = %response.body,
                error = %e,
                "Service root could not be decoded"
            );
            NeoError::decode(format!("invalid service root at {}: {}", base_url, e))
        })?;

        if root.cypher.is_empty() {
            warn!(
                uri = base_url,
                response = %response.body,
                "Service root has no Cypher endpoint"
            );
            return Err(NeoError::decode(format!(
                "service root at {} does not advertise a Cypher endpoint",
                base_url
            )));
        }

        if root.neo4j_version.is_empty() {
            info!("Connected to {}", base_url);
        } else {
            info!("Connected to {} (Neo4j {})", base_url, root.neo4j_version);
        }

        Ok(Self {
            base_url: base_url.to_string(),
            root,
            transport,
        })
    }

    /// The URL the service root was fetched from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URLs advertised by the server.
    pub fn service_root(&self) -> &ServiceRoot {
        &self.root
    }

    /// Server version, if the server reported one.
    pub fn neo4j_version(&self) -> Option<&str> {
        Some(self.root.neo4j_version.as_str()).filter(|v| !v.is_empty())
    }

    /// URL of the Cypher endpoint.
    pub fn href_cypher(&self) -> &str {
        &self.root.cypher
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("base_url", &self.base_url)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
