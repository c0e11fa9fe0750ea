//! HTTP server error types
//!
//! Error handling for the dispatch pipeline: transport malformation, body
//! acquisition failures, and server lifecycle errors.

use crate::routing::Method;
use hyper::StatusCode;
use thiserror::Error;

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

/// HTTP server errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Server startup failed: {message}")]
    StartupFailed { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Request has no url")]
    MissingUrl,

    #[error("{method} does not support body")]
    UnsupportedBody { method: Method },

    #[error("Error parsing JSON body: {message}")]
    JsonParse { message: String },

    #[error("Body stream error: {message}")]
    Stream { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl HttpError {
    /// Create a startup error
    pub fn startup<T: Into<String>>(message: T) -> Self {
        HttpError::StartupFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<T: Into<String>>(message: T) -> Self {
        HttpError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a body-on-bodyless-method error
    pub fn unsupported_body(method: Method) -> Self {
        HttpError::UnsupportedBody { method }
    }

    /// Create a JSON body parse error
    pub fn json_parse<T: Into<String>>(message: T) -> Self {
        HttpError::JsonParse {
            message: message.into(),
        }
    }

    /// Create a body stream error
    pub fn stream<T: Into<String>>(message: T) -> Self {
        HttpError::Stream {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<T: Into<String>>(message: T) -> Self {
        HttpError::InternalError {
            message: message.into(),
        }
    }

    /// Get error code for consistent API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            HttpError::StartupFailed { .. } => "SERVER_STARTUP_FAILED",
            HttpError::ConfigError { .. } => "CONFIGURATION_ERROR",
            HttpError::MissingUrl => "MISSING_REQUEST_URL",
            HttpError::UnsupportedBody { .. } => "UNSUPPORTED_REQUEST_BODY",
            HttpError::JsonParse { .. } => "JSON_PARSE_ERROR",
            HttpError::Stream { .. } => "BODY_STREAM_ERROR",
            HttpError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the error maps to when it surfaces on the wire
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::MissingUrl => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::UnsupportedBody { .. }
            | HttpError::JsonParse { .. }
            | HttpError::Stream { .. } => StatusCode::BAD_REQUEST,
            HttpError::StartupFailed { .. }
            | HttpError::ConfigError { .. }
            | HttpError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-visible response text. Parse details stay in the server log;
    /// the wire message for body failures is deliberately generic.
    pub fn client_message(&self) -> String {
        match self {
            HttpError::MissingUrl => "No request url".to_string(),
            HttpError::UnsupportedBody { method } => {
                format!("{} does not support body", method)
            }
            HttpError::JsonParse { .. } | HttpError::Stream { .. } => {
                "Error parsing request body".to_string()
            }
            _ => "Internal Server Error".to_string(),
        }
    }
}

// Convert from std::io::Error
impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::InternalError {
            message: format!("IO error: {}", err),
        }
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::InternalError {
            message: format!("JSON serialization error: {}", err),
        }
    }
}
