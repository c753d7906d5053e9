//! Error types for neocypher.
//!
//! Every failure carries its kind plus the context (URI, status, server
//! error body) that triggered it, so callers branch on [`ErrorKind`] instead
//! of comparing against shared sentinel values.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for neocypher operations.
#[derive(Error, Debug)]
pub enum NeoError {
    /// The request could not complete (connection refused, timeout, etc.)
    #[error("Transport error calling {uri}: {message}")]
    Transport { uri: String, message: String },

    /// The server answered with a status other than the expected one.
    #[error("Bad response from {uri}: HTTP {status}{}", server_suffix(.server))]
    BadResponse {
        uri: String,
        status: u16,
        server: Option<ServerError>,
    },

    /// Returned JSON does not fit the requested shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (invalid config file, bad URL, bad CLI input, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

fn server_suffix(server: &Option<ServerError>) -> String {
    match server {
        Some(err) => format!(" ({err})"),
        None => String::new(),
    }
}

/// Discriminant of [`NeoError`], for callers that only care about the class
/// of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    BadResponse,
    Decode,
    Config,
}

impl NeoError {
    /// Creates a transport error for the given URI.
    pub fn transport(uri: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            uri: uri.into(),
            message: msg.into(),
        }
    }

    /// Creates a bad-response error, keeping whatever server error body was
    /// decodable.
    pub fn bad_response(uri: impl Into<String>, status: u16, server: Option<ServerError>) -> Self {
        Self::BadResponse {
            uri: uri.into(),
            status,
            server,
        }
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::BadResponse { .. } => ErrorKind::BadResponse,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the HTTP status for bad-response errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "Transport Error",
            ErrorKind::BadResponse => "Bad Response",
            ErrorKind::Decode => "Decode Error",
            ErrorKind::Config => "Configuration Error",
        }
    }
}

impl From<serde_json::Error> for NeoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Error body returned by the Neo4j REST API on failure.
///
/// Older servers send `message`/`exception`/`fullname`/`stacktrace`; newer
/// ones add an `errors` list of `{code, message}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub exception: String,

    #[serde(default)]
    pub fullname: String,

    #[serde(default)]
    pub stacktrace: Vec<String>,

    #[serde(default)]
    pub errors: Vec<ServerErrorEntry>,
}

/// One entry of a server error's `errors` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerErrorEntry {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub message: String,
}

impl ServerError {
    /// Decodes a server error from a response body, if it looks like one.
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        let err: ServerError = serde_json::from_value(body.clone()).ok()?;
        if err.message.is_empty() && err.exception.is_empty() && err.errors.is_empty() {
            return None;
        }
        Some(err)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.exception.is_empty() {
            write!(f, "{}: {}", self.exception, self.message)
        } else if let Some(first) = self.errors.first() {
            write!(f, "{}: {}", first.code, first.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Result type alias using NeoError.
pub type Result<T> = std::result::Result<T, NeoError>;
