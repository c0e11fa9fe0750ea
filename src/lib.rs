//! # sprocket
//!
//! Minimal HTTP server toolkit: method-based routing, path-prefix
//! middleware, and nested route groups over a hyper transport.
//!
//! The core is the request-dispatch pipeline:
//! - Route registration and exact-match lookup over normalized paths
//! - Path-scoped middleware with continuation-controlled chaining
//! - One-shot request-body acquisition with a method/body policy and
//!   declared-JSON decoding
//!
//! ```rust,no_run
//! use sprocket::{RequestLogger, Response, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new();
//!     server
//!         .use_middleware("*", RequestLogger::new())
//!         .get("/hello", |_req| async { Response::ok().text("hi") });
//!     server.group("/api", |api| {
//!         api.get("/status", |_req| async {
//!             Response::ok().json_value(serde_json::json!({"status": "ok"}))
//!         });
//!     });
//!     server.listen("127.0.0.1:3000").await?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod request;
pub mod response;
pub mod routing;
pub mod server;
pub mod testing;

// Main server API
pub use config::{HttpConfig, HttpDefaults};
pub use errors::{HttpError, HttpResult};
pub use server::Server;

// Re-export routing types
pub use routing::{normalize_path, BoxFuture, Method, RouteHandler, Router};

// Re-export request/response types
pub use request::{Request, RequestBody};
pub use response::{Response, ResponseBody};

// Re-export middleware types
pub use middleware::{Middleware, MiddlewareEntry, MiddlewarePath, Next, NextFuture, RequestLogger};

// Re-export logging setup
pub use logging::{init_logging, LoggingConfig};

// Transport status codes are used as-is
pub use hyper::StatusCode;
