//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Method, Response, Transport};
use crate::error::{NeoError, Result};

/// Default timeout for REST requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport that talks to a real server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| NeoError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Maps a reqwest failure onto a transport error for `url`.
    fn request_error(url: &str, e: reqwest::Error) -> NeoError {
        if e.is_timeout() {
            NeoError::transport(url, "request timed out")
        } else if e.is_connect() {
            NeoError::transport(url, format!("failed to connect: {}", e))
        } else {
            NeoError::transport(url, format!("request failed: {}", e))
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response> {
        debug!("{} {}", method.as_str(), url);

        let response = request
            .send()
            .await
            .map_err(|e| Self::request_error(url, e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| NeoError::transport(url, format!("failed to read response: {}", e)))?;

        debug!("{} {} -> {}", method.as_str(), url, status);
        Ok(Response::from_text(status, &text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Response> {
        self.send(Method::Get, url, self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Response> {
        self.send(Method::Post, url, self.client.post(url).json(body))
            .await
    }
}
