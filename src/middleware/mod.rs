//! # Middleware
//!
//! Path-scoped middleware with continuation-controlled execution. A
//! middleware receives the request and a [`Next`] continuation; calling
//! `next.run(request)` proceeds down the chain, returning a response
//! without calling it short-circuits everything after it, including the
//! route handler.

pub mod logging;
pub mod pipeline;

pub use logging::RequestLogger;
pub use pipeline::{Middleware, MiddlewareEntry, MiddlewarePath, Next, NextFuture};
