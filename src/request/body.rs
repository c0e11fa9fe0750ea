//! Request body acquisition
//!
//! Consumes the transport body stream exactly once per request (`acquire`
//! takes it by value, so a second read cannot be expressed), enforces the
//! method/body policy, and decodes JSON when the request declares it.

use crate::errors::{HttpError, HttpResult};
use crate::routing::Method;
use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, CONTENT_TYPE};

/// The acquired request body, keeping the "is this JSON" distinction at the
/// type level. Non-JSON bodies pass through as decoded text verbatim; an
/// absent body is the empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Json(serde_json::Value),
}

impl RequestBody {
    pub fn empty() -> Self {
        RequestBody::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Text(text) if text.is_empty())
    }

    /// The raw text, when the body was not parsed as JSON
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestBody::Text(text) => Some(text),
            RequestBody::Json(_) => None,
        }
    }

    /// The parsed value, when the body was declared and parsed as JSON
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            RequestBody::Text(_) => None,
            RequestBody::Json(value) => Some(value),
        }
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        RequestBody::empty()
    }
}

/// Whether the declared content type asks for JSON decoding
fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.contains("application/json"))
}

/// Read the whole request body and produce a [`RequestBody`].
///
/// Policy, applied in order:
/// - GET, HEAD and OPTIONS must not carry a body: the first non-empty data
///   frame fails the acquisition with [`HttpError::UnsupportedBody`]; an
///   empty stream resolves to the empty string.
/// - Other methods accumulate every frame and decode the bytes as text.
/// - If the `Content-Type` header contains `application/json`, the text is
///   parsed; a parse failure is [`HttpError::JsonParse`] with the decoder's
///   message. Without the header the text passes through verbatim.
/// - A transport error on the stream fails with [`HttpError::Stream`].
pub async fn acquire<B>(method: Method, headers: &HeaderMap, body: B) -> HttpResult<RequestBody>
where
    B: hyper::body::Body<Data = Bytes> + Unpin,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut body = body;

    if !method.supports_body() {
        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(stream_error)?;
            if let Some(data) = frame.data_ref() {
                if !data.is_empty() {
                    return Err(HttpError::unsupported_body(method));
                }
            }
        }
        return Ok(RequestBody::empty());
    }

    let collected = body.collect().await.map_err(stream_error)?;
    let text = String::from_utf8_lossy(&collected.to_bytes()).into_owned();

    if declares_json(headers) {
        match serde_json::from_str(&text) {
            Ok(value) => Ok(RequestBody::Json(value)),
            Err(err) => Err(HttpError::json_parse(err.to_string())),
        }
    } else {
        Ok(RequestBody::Text(text))
    }
}

fn stream_error<E>(err: E) -> HttpError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    HttpError::stream(err.into().to_string())
}
