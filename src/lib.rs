//! neocypher - a client for the Neo4j HTTP REST API.
//!
//! Sends Cypher statements to a running server and decodes the column/row
//! results into caller-defined record types.
//!
//! ```no_run
//! use neocypher::{ColumnMapping, CypherQuery, Database, Record};
//! use neocypher::config::ConnectionConfig;
//!
//! #[derive(Debug, Default)]
//! struct Name {
//!     name: String,
//! }
//!
//! impl Record for Name {
//!     fn mapping() -> ColumnMapping<Self> {
//!         ColumnMapping::new().field("name", "n.name", |r: &mut Name, v| r.name = v)
//!     }
//! }
//!
//! # async fn run() -> neocypher::Result<()> {
//! let db = Database::connect(&ConnectionConfig::default()).await?;
//! let mut names: Vec<Name> = Vec::new();
//! let mut query = CypherQuery::new("MATCH (n) WHERE n.name = {name} RETURN n.name")
//!     .param("name", "you")
//!     .into_destination(&mut names);
//! db.cypher(&mut query).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cypher;
pub mod db;
pub mod error;
pub mod logging;
pub mod record;
pub mod transport;

pub use cypher::{CypherQuery, RawResult};
pub use db::{Database, ServiceRoot};
pub use error::{ErrorKind, NeoError, Result, ServerError};
pub use record::{ColumnMapping, Destination, Record};
