//! Middleware trait, path matching, and the handler chain
//!
//! The chain is an explicit ordered list plus a cursor: each [`Next`] holds
//! the full chain and the index of the handler it will invoke. "Calling the
//! continuation" is an advance-and-invoke operation, so chain depth is
//! bounded by the number of registered middleware and there is no hidden
//! recursion.

use crate::request::Request;
use crate::response::Response;
use crate::routing::{normalize_path, BoxFuture, RouteHandler};
use std::sync::Arc;

/// Type alias for the boxed future a middleware returns
pub type NextFuture<'a> = BoxFuture<'a, Response>;

/// Middleware with a handle(request, next) contract.
///
/// Implementations decide whether the rest of the chain runs: call
/// `next.run(request)` to proceed, or build a response directly to
/// short-circuit.
pub trait Middleware: Send + Sync + std::fmt::Debug {
    /// Handle the request and choose whether to continue the chain
    fn handle(&self, request: Request, next: Next) -> NextFuture<'static>;

    /// Optional middleware name for debugging
    fn name(&self) -> &'static str {
        "Middleware"
    }
}

/// Where a middleware entry applies.
///
/// Registered as `"*"` or `"/"` it applies to every request; any other
/// path is normalized and matched as an exact path or a slash-boundary
/// prefix. `/api` matches `/api` and `/api/users` but never `/apiv2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiddlewarePath {
    All,
    Prefix(String),
}

impl MiddlewarePath {
    /// Interpret a registration path
    pub fn parse(path: &str) -> Self {
        match path {
            "*" | "/" => MiddlewarePath::All,
            _ => MiddlewarePath::Prefix(normalize_path(path)),
        }
    }

    /// Does a normalized request path fall under this entry?
    pub fn matches(&self, path: &str) -> bool {
        match self {
            MiddlewarePath::All => true,
            MiddlewarePath::Prefix(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .map_or(false, |rest| rest.starts_with('/'))
            }
        }
    }
}

/// A registered middleware: its match path and its handler.
/// Entries live in one ordered sequence; registration order is execution
/// order among matches.
#[derive(Debug, Clone)]
pub struct MiddlewareEntry {
    path: MiddlewarePath,
    handler: Arc<dyn Middleware>,
}

impl MiddlewareEntry {
    pub fn new(path: MiddlewarePath, handler: Arc<dyn Middleware>) -> Self {
        Self { path, handler }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.path.matches(path)
    }

    pub fn handler(&self) -> Arc<dyn Middleware> {
        self.handler.clone()
    }

    pub fn name(&self) -> &'static str {
        self.handler.name()
    }
}

/// The rest of the handler chain for one request.
///
/// Holds the matching middleware in registration order, the terminal route
/// handler, and a cursor. Each `run` consumes the `Next`, so a handler can
/// continue the chain at most once; dropping it without calling `run` stops
/// the chain there.
pub struct Next {
    chain: Arc<[Arc<dyn Middleware>]>,
    terminal: RouteHandler,
    cursor: usize,
}

impl Next {
    /// Build the chain head for one request
    pub(crate) fn new(chain: Vec<Arc<dyn Middleware>>, terminal: RouteHandler) -> Self {
        Self {
            chain: chain.into(),
            terminal,
            cursor: 0,
        }
    }

    /// Advance the cursor and invoke the next handler.
    ///
    /// Past the last middleware this invokes the synthetic terminal step:
    /// the route handler runs with no continuation of its own.
    pub fn run(self, request: Request) -> NextFuture<'static> {
        match self.chain.get(self.cursor).cloned() {
            Some(middleware) => {
                let next = Next {
                    chain: self.chain,
                    terminal: self.terminal,
                    cursor: self.cursor + 1,
                };
                middleware.handle(request, next)
            }
            None => (self.terminal)(request),
        }
    }
}
