//! Command-line argument parsing and result rendering for neocypher.

use clap::Parser;
use neocypher::config::ConnectionConfig;
use neocypher::{NeoError, RawResult, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Output format for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated header and rows.
    #[default]
    Text,
    /// The raw `{"columns", "data"}` result.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Run a Cypher statement against a Neo4j server's REST API.
#[derive(Parser, Debug)]
#[command(name = "neocypher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Cypher statement to execute
    #[arg(value_name = "STATEMENT")]
    pub statement: String,

    /// Service root URL (e.g., http://localhost:7474/db/data/)
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,

    /// Use named connection from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "NEOCYPHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Query parameter as NAME=VALUE; VALUE is parsed as JSON, else taken as a string
    #[arg(short = 'P', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Output format: text or json
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable debug logging for neocypher
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Converts CLI arguments to a ConnectionConfig.
    ///
    /// This creates a config from CLI args only, without merging with file config.
    pub fn to_connection_config(&self) -> Result<Option<ConnectionConfig>> {
        let mut config = match &self.url {
            Some(url) => ConnectionConfig::from_connection_string(url)?,
            None if self.timeout.is_some() => ConnectionConfig::default(),
            None => return Ok(None),
        };
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        Ok(Some(config))
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(neocypher::config::Config::default_path)
    }

    /// Returns the named connection to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    /// Parses every `--param` into a parameter map, in the order given.
    pub fn parameters(&self) -> Result<Map<String, Value>> {
        self.params.iter().map(|p| parse_param(p)).collect()
    }
}

/// Parses a single `NAME=VALUE` parameter.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw.split_once('=').ok_or_else(|| {
        NeoError::config(format!("Invalid parameter '{raw}'. Expected NAME=VALUE"))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(NeoError::config(format!(
            "Invalid parameter '{raw}'. Name is empty"
        )));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Renders a result set for stdout.
pub fn render(result: &RawResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => {
            let mut out = result.columns().join("\t");
            for row in result.rows() {
                out.push('\n');
                let cells: Vec<String> = row.iter().map(render_cell).collect();
                out.push_str(&cells.join("\t"));
            }
            Ok(out)
        }
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}
