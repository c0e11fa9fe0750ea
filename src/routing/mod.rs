//! HTTP routing for sprocket
//!
//! This module provides the method-based routing core:
//! - Fixed HTTP method set with per-method route tables
//! - Exact-match path lookup over normalized paths
//! - Route groups with composable prefixes
//!
//! There is no parameter or wildcard matching in route paths; a route is a
//! (method, normalized path) pair bound to exactly one terminal handler.

pub mod path;
pub mod router;

pub use path::normalize_path;
pub use router::Router;

use crate::request::Request;
use crate::response::Response;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for boxed futures returned by handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A terminal route handler: consumes the request, produces the response.
/// Route handlers are always the last link of a handler chain and have no
/// continuation access.
pub type RouteHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function or closure into a stored [`RouteHandler`].
pub(crate) fn into_route_handler<H, Fut>(handler: H) -> RouteHandler
where
    H: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |request| Box::pin(handler(request)))
}

/// HTTP methods supported by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
}

impl Method {
    /// All methods, in a stable order
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::PATCH,
    ];

    /// Method name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }

    /// Whether requests with this method may carry a body.
    /// GET, HEAD and OPTIONS requests are rejected if body data arrives.
    pub fn supports_body(&self) -> bool {
        !matches!(self, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    /// Map a wire-level method onto the routable set. Methods outside the
    /// set (TRACE, CONNECT, extensions) have no route table and return None.
    pub fn from_hyper(method: &hyper::Method) -> Option<Self> {
        match *method {
            hyper::Method::GET => Some(Method::GET),
            hyper::Method::POST => Some(Method::POST),
            hyper::Method::PUT => Some(Method::PUT),
            hyper::Method::DELETE => Some(Method::DELETE),
            hyper::Method::HEAD => Some(Method::HEAD),
            hyper::Method::OPTIONS => Some(Method::OPTIONS),
            hyper::Method::PATCH => Some(Method::PATCH),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-method route tables: method -> normalized path -> handler.
///
/// Registering the same method+path again silently overwrites the previous
/// handler; last registration wins.
#[derive(Default, Clone)]
pub struct RouteTable {
    routes: HashMap<Method, HashMap<String, RouteHandler>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. The path is normalized before it becomes a key.
    pub fn insert(&mut self, method: Method, path: &str, handler: RouteHandler) {
        self.routes
            .entry(method)
            .or_default()
            .insert(normalize_path(path), handler);
    }

    /// Exact-match lookup against an already-normalized path.
    pub fn get(&self, method: Method, path: &str) -> Option<&RouteHandler> {
        self.routes.get(&method)?.get(path)
    }

    /// Flat-copy every binding from `other` into this table.
    /// Collisions resolve the same way as `insert`: the incoming handler wins.
    pub fn merge(&mut self, other: RouteTable) {
        for (method, routes) in other.routes {
            let table = self.routes.entry(method).or_default();
            for (path, handler) in routes {
                table.insert(path, handler);
            }
        }
    }

    /// Total number of registered routes across all methods
    pub fn route_count(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.route_count() == 0
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for method in Method::ALL {
            if let Some(routes) = self.routes.get(&method) {
                let mut paths: Vec<&String> = routes.keys().collect();
                paths.sort();
                map.entry(&method, &paths);
            }
        }
        map.finish()
    }
}
