//! Mock transport for testing.
//!
//! Serves scripted responses keyed by method and URL, and records every
//! request it receives.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::{Method, Response, Transport};
use crate::error::{NeoError, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Response),
    Fail(String),
}

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

/// A transport that returns predefined responses.
///
/// Responses queued for the same route are served in order; the last one is
/// repeated once the queue is down to a single entry. Unscripted routes
/// answer 404 with an empty body.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Creates a mock transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, url: &str, scripted: Scripted) {
        let mut routes = self.routes.lock().unwrap_or_else(|p| p.into_inner());
        routes
            .entry((method, url.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queues a response for `GET url`.
    pub fn on_get(self, url: &str, response: Response) -> Self {
        self.push(Method::Get, url, Scripted::Respond(response));
        self
    }

    /// Queues a response for `POST url`.
    pub fn on_post(self, url: &str, response: Response) -> Self {
        self.push(Method::Post, url, Scripted::Respond(response));
        self
    }

    /// Queues a transport failure for `POST url`.
    pub fn fail_post(self, url: &str, message: &str) -> Self {
        self.push(Method::Post, url, Scripted::Fail(message.to_string()));
        self
    }

    /// Queues a transport failure for `GET url`.
    pub fn fail_get(self, url: &str, message: &str) -> Self {
        self.push(Method::Get, url, Scripted::Fail(message.to_string()));
        self
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Returns the body of the most recent POST, if any.
    pub fn last_post_body(&self) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == Method::Post)
            .and_then(|r| r.body)
    }

    fn serve(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(RecordedRequest {
                method,
                url: url.to_string(),
                body: body.cloned(),
            });

        let mut routes = self.routes.lock().unwrap_or_else(|p| p.into_inner());
        let next = match routes.get_mut(&(method, url.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(NeoError::transport(url, message)),
            None => Ok(Response::new(404, Value::Null)),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Response> {
        self.serve(Method::Get, url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Response> {
        self.serve(Method::Post, url, Some(body))
    }
}
