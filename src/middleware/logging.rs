//! Request logging middleware

use super::{Middleware, Next, NextFuture};
use crate::request::Request;
use std::time::Instant;
use tracing::info;

/// Logs method, path, response status and elapsed time for every request
/// that reaches it. Register under `"*"` to cover the whole surface.
#[derive(Debug, Default)]
pub struct RequestLogger;

impl RequestLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for RequestLogger {
    fn handle(&self, request: Request, next: Next) -> NextFuture<'static> {
        Box::pin(async move {
            let start = Instant::now();
            let method = request.method;
            let path = request.path.clone();

            let response = next.run(request).await;

            info!(
                target: "sprocket::http",
                "{} {} -> {} ({:?})",
                method,
                path,
                response.status_code(),
                start.elapsed()
            );

            response
        })
    }

    fn name(&self) -> &'static str {
        "RequestLogger"
    }
}
