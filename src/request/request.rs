//! Request abstraction handed to middleware and route handlers
//!
//! Built once per request by the dispatcher: normalized path, decoded query
//! and cookie maps, and the acquired body. Handlers own the request; there
//! is no shared mutable state between concurrent requests.

use super::RequestBody;
use crate::errors::{HttpError, HttpResult};
use crate::routing::Method;
use hyper::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Per-request context
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    /// Normalized request path (the form routes are keyed by)
    pub path: String,
    pub headers: HeaderMap,
    /// Decoded query parameters, one value per key, last wins
    pub query: HashMap<String, String>,
    /// Cookies from the `Cookie:` header
    pub cookies: HashMap<String, String>,
    pub body: RequestBody,
}

impl Request {
    /// Create a bare request context. The dispatcher fills in query,
    /// cookies and body; tests use the `with_*` builders below.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: HashMap::new(),
            cookies: HashMap::new(),
            body: RequestBody::empty(),
        }
    }

    /// Set request headers (consuming)
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set query parameters (consuming)
    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// Set cookies (consuming)
    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Set the acquired body (consuming)
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Get query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&String> {
        self.query.get(name)
    }

    /// Get cookie by name
    pub fn cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    /// Get header value as a string, when present and valid UTF-8
    pub fn header_string(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<String> {
        self.header_string("content-type")
    }

    /// Check if the request declared a JSON content type
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map_or(false, |value| value.contains("application/json"))
    }

    /// The raw body text, when the body was not parsed as JSON
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_text()
    }

    /// The parsed body value, when the body was parsed as JSON
    pub fn body_json(&self) -> Option<&serde_json::Value> {
        self.body.as_json()
    }

    /// Deserialize the body into a typed value.
    ///
    /// Works from the parsed JSON value when the request declared JSON, and
    /// falls back to parsing the raw text otherwise.
    pub fn json<T: DeserializeOwned>(&self) -> HttpResult<T> {
        match &self.body {
            RequestBody::Json(value) => serde_json::from_value(value.clone())
                .map_err(|err| HttpError::json_parse(err.to_string())),
            RequestBody::Text(text) => {
                serde_json::from_str(text).map_err(|err| HttpError::json_parse(err.to_string()))
            }
        }
    }
}
