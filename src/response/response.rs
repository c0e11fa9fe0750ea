//! Response building
//!
//! Fluent response builder handed back by handlers and middleware, plus the
//! conversion into the transport's response type. Bodies are buffered
//! (text, JSON or nothing); streaming responses are out of scope.

use crate::errors::{HttpError, HttpResult};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::StatusCode;
use serde::Serialize;

/// Response builder with status, headers and a buffered body
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

/// Response body types
#[derive(Debug)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

impl Response {
    /// Create a new response with OK status
    pub fn new() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// Create a response with a specific status code
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// 200 OK
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// 400 Bad Request
    pub fn bad_request() -> Self {
        Self::with_status(StatusCode::BAD_REQUEST)
    }

    /// 404 Not Found
    pub fn not_found() -> Self {
        Self::with_status(StatusCode::NOT_FOUND)
    }

    /// 500 Internal Server Error
    pub fn internal_server_error() -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Set response status code (consuming)
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set response status code (borrowing - for middleware use)
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Get response status code
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Get response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response body
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Set response body as text (consuming)
    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.body = ResponseBody::Text(text.into());
        self
    }

    /// Set response body as text (borrowing - for middleware use)
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.body = ResponseBody::Text(text.into());
    }

    /// Set response body as JSON (consuming)
    pub fn json<T: Serialize>(mut self, data: &T) -> HttpResult<Self> {
        let value = serde_json::to_value(data)?;
        self.body = ResponseBody::Json(value);
        Ok(self)
    }

    /// Set response body as a raw JSON value (consuming)
    pub fn json_value(mut self, value: serde_json::Value) -> Self {
        self.body = ResponseBody::Json(value);
        self
    }

    /// Add header to response (consuming)
    pub fn header<K, V>(mut self, key: K, value: V) -> HttpResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let name = key
            .as_ref()
            .parse::<HeaderName>()
            .map_err(|e| HttpError::internal(format!("Invalid header name: {}", e)))?;
        let value = value
            .as_ref()
            .parse::<HeaderValue>()
            .map_err(|e| HttpError::internal(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add header to response (borrowing - for middleware use)
    pub fn add_header<K, V>(&mut self, key: K, value: V) -> HttpResult<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let name = key
            .as_ref()
            .parse::<HeaderName>()
            .map_err(|e| HttpError::internal(format!("Invalid header name: {}", e)))?;
        let value = value
            .as_ref()
            .parse::<HeaderValue>()
            .map_err(|e| HttpError::internal(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Add header, falling back to a 500 response when the name or value is
    /// invalid (never panics)
    pub fn with_header<K, V>(self, key: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.header(key, value).unwrap_or_else(|err| {
            tracing::error!("Header creation failed in with_header: {}", err);
            Response::internal_server_error()
        })
    }

    /// Build the transport response.
    ///
    /// A default `Content-Type` is derived from the body kind when the
    /// handler did not set one.
    pub fn build(mut self) -> HttpResult<hyper::Response<Full<Bytes>>> {
        if !self.headers.contains_key("content-type") {
            match &self.body {
                ResponseBody::Json(_) => {
                    self.add_header("content-type", "application/json")?;
                }
                ResponseBody::Text(_) => {
                    self.add_header("content-type", "text/plain; charset=utf-8")?;
                }
                ResponseBody::Empty => {}
            }
        }

        let body = match self.body {
            ResponseBody::Empty => Bytes::new(),
            ResponseBody::Text(text) => Bytes::from(text),
            ResponseBody::Json(value) => {
                let json = serde_json::to_string(&value)?;
                Bytes::from(json)
            }
        };

        let mut response = hyper::Response::new(Full::new(body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        Ok(response)
    }

    /// Infallible conversion for the connection driver: build the response,
    /// or log and substitute a plain 500.
    pub(crate) fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        self.build().unwrap_or_else(|err| {
            tracing::error!("Failed to build response: {}", err);
            let mut fallback =
                hyper::Response::new(Full::new(Bytes::from_static(b"Internal Server Error")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
