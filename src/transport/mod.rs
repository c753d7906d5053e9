//! HTTP transport seam for neocypher.
//!
//! The client only needs two capabilities from the wire: GET a URL and POST
//! a JSON body, each yielding the numeric status and the decoded JSON body.
//! Keeping this behind a trait lets tests script responses without a server.

mod http;
mod mock;

pub use http::{HttpTransport, DEFAULT_TIMEOUT_SECS};
pub use mock::{MockTransport, RecordedRequest};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// HTTP method used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A response as seen by the client: status plus decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Numeric HTTP status code.
    pub status: u16,

    /// Body decoded as JSON. An empty body is `Null`; a body that is not
    /// JSON is kept verbatim as a `String` so it can still be logged.
    pub body: Value,
}

impl Response {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Creates a 200 response with the given body.
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// Builds a response from raw body text.
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        Self { status, body }
    }
}

/// Trait defining the transport used by [`crate::Database`].
///
/// Implementations must be safe to share between concurrent queries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET request.
    async fn get(&self, url: &str) -> Result<Response>;

    /// Issues a POST request with a JSON body.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Response>;
}
