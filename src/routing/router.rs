//! Route groups for organizing related routes
//!
//! A [`Router`] accumulates method+path bindings under a shared prefix so
//! callers do not repeat it, and supports arbitrarily nested grouping. It is
//! a transient registration surface: created for the duration of a `group`
//! call, handed to the grouping closure, then flat-merged into its owner
//! (the server or a parent router) and discarded.

use super::{into_route_handler, normalize_path, Method, RouteTable};
use crate::request::Request;
use crate::response::Response;
use std::future::Future;

/// Route group with a shared path prefix
#[derive(Default)]
pub struct Router {
    prefix: String,
    table: RouteTable,
}

impl Router {
    /// Create a new router. The prefix may be empty.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            table: RouteTable::new(),
        }
    }

    /// Get the prefix for this router
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn add_route<H, Fut>(&mut self, method: Method, path: &str, handler: H)
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let full_path = format!("{}{}", self.prefix, path);
        self.table
            .insert(method, &full_path, into_route_handler(handler));
    }

    /// Register a GET route under this router's prefix
    pub fn get<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::GET, path, handler);
        self
    }

    /// Register a POST route under this router's prefix
    pub fn post<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::POST, path, handler);
        self
    }

    /// Register a PUT route under this router's prefix
    pub fn put<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::PUT, path, handler);
        self
    }

    /// Register a DELETE route under this router's prefix
    pub fn delete<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::DELETE, path, handler);
        self
    }

    /// Register a HEAD route under this router's prefix
    pub fn head<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::HEAD, path, handler);
        self
    }

    /// Register an OPTIONS route under this router's prefix
    pub fn options<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::OPTIONS, path, handler);
        self
    }

    /// Register a PATCH route under this router's prefix
    pub fn patch<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::PATCH, path, handler);
        self
    }

    /// Register routes under a nested prefix.
    ///
    /// The closure runs synchronously with a router whose prefix is
    /// `normalize(prefix + sub_prefix)`; everything it registers is then
    /// flat-copied into this router. Nesting depth is unbounded, and by the
    /// time control returns to the owner the result is a single flat table.
    pub fn group(&mut self, sub_prefix: &str, build: impl FnOnce(&mut Router)) -> &mut Self {
        let nested_prefix = normalize_path(&format!("{}{}", self.prefix, sub_prefix));
        let mut nested = Router::new(nested_prefix);
        build(&mut nested);
        self.table.merge(nested.table);
        self
    }

    /// Surrender the accumulated table for merging into the owner
    pub(crate) fn into_table(self) -> RouteTable {
        self.table
    }
}
