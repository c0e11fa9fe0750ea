//! # Sprocket server
//!
//! The dispatcher: owns the per-method route tables and the ordered
//! middleware list, and drives the per-request pipeline — URL checks, query
//! and cookie decoding, body acquisition, route lookup, middleware matching
//! and the handler chain.
//!
//! Servers are plain owned values; construct as many independent instances
//! as needed. Registration happens before [`Server::listen`], request
//! handling only reads the tables, so no locking is involved.
//!
//! # Example
//!
//! ```rust,no_run
//! use sprocket::{Response, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new();
//!     server.get("/hello", |_req| async { Response::ok().text("hi") });
//!     server.listen("127.0.0.1:3000").await?;
//!     Ok(())
//! }
//! ```

use super::lifecycle;
use crate::config::HttpConfig;
use crate::errors::{HttpError, HttpResult};
use crate::middleware::{Middleware, MiddlewareEntry, MiddlewarePath, Next};
use crate::request::{acquire, parse_cookies, Request};
use crate::response::Response;
use crate::routing::{into_route_handler, normalize_path, Method, RouteTable, Router};
use hyper::body::Bytes;
use hyper::header::COOKIE;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// The HTTP server and registration surface
#[derive(Default)]
pub struct Server {
    config: HttpConfig,
    routes: RouteTable,
    middleware: Vec<MiddlewareEntry>,
}

impl Server {
    /// Create a server with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpConfig::default())
    }

    /// Create a server with the given configuration
    pub fn with_config(config: HttpConfig) -> Self {
        Self {
            config,
            routes: RouteTable::new(),
            middleware: Vec::new(),
        }
    }

    fn add_route<H, Fut>(&mut self, method: Method, path: &str, handler: H)
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.insert(method, path, into_route_handler(handler));
    }

    /// Register a GET route
    pub fn get<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::GET, path, handler);
        self
    }

    /// Register a POST route
    pub fn post<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::POST, path, handler);
        self
    }

    /// Register a PUT route
    pub fn put<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::PUT, path, handler);
        self
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::DELETE, path, handler);
        self
    }

    /// Register a HEAD route
    pub fn head<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::HEAD, path, handler);
        self
    }

    /// Register an OPTIONS route
    pub fn options<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::OPTIONS, path, handler);
        self
    }

    /// Register a PATCH route
    pub fn patch<H, Fut>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::PATCH, path, handler);
        self
    }

    /// Append a middleware entry.
    ///
    /// `"*"` and `"/"` apply the middleware to every request; any other path
    /// scopes it to that path and everything below it (slash-boundary
    /// prefix). Middleware executes in registration order among matches.
    pub fn use_middleware<M>(&mut self, path: &str, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.middleware.push(MiddlewareEntry::new(
            MiddlewarePath::parse(path),
            Arc::new(middleware),
        ));
        self
    }

    /// Register routes under a shared prefix.
    ///
    /// The closure receives a [`Router`] whose registrations (including
    /// nested groups) are flat-merged into this server when it returns.
    pub fn group(&mut self, prefix: &str, build: impl FnOnce(&mut Router)) -> &mut Self {
        let mut router = Router::new(prefix);
        build(&mut router);
        self.routes.merge(router.into_table());
        self
    }

    /// Get the server configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Total number of registered routes
    pub fn route_count(&self) -> usize {
        self.routes.route_count()
    }

    /// Registered middleware names, in execution order
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(MiddlewareEntry::name).collect()
    }

    /// Start the server on the specified address
    pub async fn listen<A: Into<String>>(self, addr: A) -> HttpResult<()> {
        let addr_str = addr.into();
        let socket_addr: SocketAddr = addr_str
            .parse()
            .map_err(|e| HttpError::config(format!("Invalid address '{}': {}", addr_str, e)))?;
        self.listen_on(socket_addr).await
    }

    /// Start the server on the specified SocketAddr
    pub async fn listen_on(self, addr: SocketAddr) -> HttpResult<()> {
        info!(
            "🚀 Starting sprocket on {} ({} routes, {} middleware)",
            addr,
            self.routes.route_count(),
            self.middleware.len()
        );

        let inner = Arc::new(ServerInner {
            config: self.config,
            routes: self.routes,
            middleware: self.middleware,
        });
        lifecycle::serve(addr, inner).await?;

        info!("🛑 Server shut down gracefully");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> ServerInner {
        ServerInner {
            config: self.config,
            routes: self.routes,
            middleware: self.middleware,
        }
    }
}

/// Immutable snapshot of the server shared by the connection tasks
pub(crate) struct ServerInner {
    pub(crate) config: HttpConfig,
    routes: RouteTable,
    middleware: Vec<MiddlewareEntry>,
}

impl ServerInner {
    /// Handle one request through the full pipeline.
    ///
    /// Generic over the transport body so tests can drive it with buffered
    /// bodies; the listen loop feeds it `hyper::body::Incoming`.
    pub(crate) async fn dispatch<B>(&self, req: hyper::Request<B>) -> Response
    where
        B: hyper::body::Body<Data = Bytes> + Unpin,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();

        // A request without a path (authority-form target) cannot be routed
        let path_and_query = match parts.uri.path_and_query() {
            Some(pq) => pq.clone(),
            None => {
                return Response::internal_server_error().text("No request url");
            }
        };

        let query = parse_query(path_and_query.query());
        let cookies = parse_cookies(parts.headers.get(COOKIE));

        // Methods outside the routable set have no table to match against
        let method = match Method::from_hyper(&parts.method) {
            Some(method) => method,
            None => return Response::not_found().text("Not Found"),
        };

        let body = match acquire(method, &parts.headers, body).await {
            Ok(body) => body,
            Err(err) => {
                error!("Error acquiring request body: {}", err);
                let mut response = Response::with_status(err.status()).text(err.client_message());
                if matches!(err, HttpError::UnsupportedBody { .. }) {
                    response = response.with_header("connection", "close");
                }
                return response;
            }
        };

        let path = normalize_path(path_and_query.path());

        let handler = match self.routes.get(method, &path) {
            Some(handler) => handler.clone(),
            None => return Response::not_found().text("Not Found"),
        };

        let matching: Vec<Arc<dyn Middleware>> = self
            .middleware
            .iter()
            .filter(|entry| entry.matches(&path))
            .map(MiddlewareEntry::handler)
            .collect();

        let request = Request::new(method, path)
            .with_headers(parts.headers)
            .with_query(query)
            .with_cookies(cookies)
            .with_body(body);

        Next::new(matching, handler).run(request).await
    }
}

/// Decode a query string into a map; one value per key, last wins.
/// An undecodable query yields an empty map rather than a failed request.
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::NextFuture;
    use crate::response::ResponseBody;
    use http_body_util::Full;
    use hyper::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn body_text(response: &Response) -> &str {
        match response.body() {
            ResponseBody::Text(text) => text,
            other => panic!("expected text body, got {:?}", other),
        }
    }

    fn empty_request(method: &str, uri: &str) -> hyper::Request<Full<Bytes>> {
        hyper::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn request_with_body(
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> hyper::Request<Full<Bytes>> {
        let mut builder = hyper::Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_url_is_500() {
        let server = Server::new();
        let inner = server.into_inner();

        // Authority-form request target carries no path
        let req = hyper::Request::builder()
            .method("CONNECT")
            .uri("example.com:443")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = inner.dispatch(req).await;
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(&response), "No request url");
    }

    #[tokio::test]
    async fn test_unmatched_route_is_404() {
        let server = Server::new();
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("GET", "/missing")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(&response), "Not Found");
    }

    #[tokio::test]
    async fn test_method_mismatch_is_404() {
        let mut server = Server::new();
        server.get("/users", |_req| async { Response::ok() });
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("POST", "/users")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unroutable_wire_method_is_404() {
        let mut server = Server::new();
        server.get("/users", |_req| async { Response::ok() });
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("TRACE", "/users")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_route_hit_with_query_and_cookies() {
        let mut server = Server::new();
        server.get("/greet", |req| async move {
            let name = req.query_param("name").cloned().unwrap_or_default();
            let session = req.cookie("session").cloned().unwrap_or_default();
            Response::ok().text(format!("{}/{}", name, session))
        });
        let inner = server.into_inner();

        let req = hyper::Request::builder()
            .method("GET")
            .uri("/greet?name=alice&name=bob")
            .header("cookie", "session=s1; theme=dark")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = inner.dispatch(req).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        // Duplicate query keys resolve last-wins
        assert_eq!(body_text(&response), "bob/s1");
    }

    #[tokio::test]
    async fn test_trailing_slash_matches_registered_route() {
        let mut server = Server::new();
        server.get("/users", |_req| async { Response::ok().text("list") });
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("GET", "/users/")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(body_text(&response), "list");
    }

    #[tokio::test]
    async fn test_get_with_body_is_400_and_closes() {
        let mut server = Server::new();
        server.get("/users", |_req| async { Response::ok() });
        let inner = server.into_inner();

        let req = request_with_body("GET", "/users", None, "unexpected");
        let response = inner.dispatch(req).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(&response), "GET does not support body");
        assert_eq!(response.headers().get("connection").unwrap(), "close");
    }

    #[tokio::test]
    async fn test_json_body_reaches_the_handler_parsed() {
        let mut server = Server::new();
        server.post("/items", |req| async move {
            let value = req.body_json().cloned().unwrap_or_default();
            Response::ok().text(value["x"].to_string())
        });
        let inner = server.into_inner();

        let req = request_with_body("POST", "/items", Some("application/json"), r#"{"x":1}"#);
        let response = inner.dispatch(req).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(body_text(&response), "1");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_before_routing() {
        let handler_calls = Arc::new(AtomicUsize::new(0));
        let calls = handler_calls.clone();

        let mut server = Server::new();
        server.post("/items", move |_req| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Response::ok()
            }
        });
        let inner = server.into_inner();

        let req = request_with_body("POST", "/items", Some("application/json"), "{x:}");
        let response = inner.dispatch(req).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(&response), "Error parsing request body");
        assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_json_body_passes_through_verbatim() {
        let mut server = Server::new();
        server.post("/echo", |req| async move {
            Response::ok().text(req.body_text().unwrap_or_default().to_string())
        });
        let inner = server.into_inner();

        let req = request_with_body("POST", "/echo", Some("text/plain"), "raw payload");
        let response = inner.dispatch(req).await;
        assert_eq!(body_text(&response), "raw payload");
    }

    #[tokio::test]
    async fn test_group_registration_flattens() {
        let mut server = Server::new();
        server.group("/a", |a| {
            a.group("/b", |b| {
                b.get("/c", |_req| async { Response::ok().text("nested") });
            });
        });
        assert_eq!(server.route_count(), 1);
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("GET", "/a/b/c")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(body_text(&response), "nested");
    }

    /// Middleware that stamps a response header after the chain returns
    #[derive(Debug)]
    struct Stamp(&'static str);

    impl Middleware for Stamp {
        fn handle(&self, request: Request, next: Next) -> NextFuture<'static> {
            let tag = self.0;
            Box::pin(async move {
                let mut response = next.run(request).await;
                if let Err(err) = response.add_header(format!("x-stamp-{}", tag), "1") {
                    error!("Failed to stamp response: {}", err);
                }
                response
            })
        }

        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[tokio::test]
    async fn test_middleware_scoping_honors_slash_boundary() {
        let mut server = Server::new();
        server
            .use_middleware("*", Stamp("all"))
            .use_middleware("/api", Stamp("api"))
            .get("/api/users", |_req| async { Response::ok() })
            .get("/apiv2", |_req| async { Response::ok() });
        assert_eq!(server.middleware_names(), vec!["all", "api"]);
        let inner = server.into_inner();

        let scoped = inner.dispatch(empty_request("GET", "/api/users")).await;
        assert!(scoped.headers().contains_key("x-stamp-all"));
        assert!(scoped.headers().contains_key("x-stamp-api"));

        let unrelated = inner.dispatch(empty_request("GET", "/apiv2")).await;
        assert!(unrelated.headers().contains_key("x-stamp-all"));
        assert!(!unrelated.headers().contains_key("x-stamp-api"));
    }

    /// Middleware that answers directly, never calling the continuation
    #[derive(Debug)]
    struct Deny;

    impl Middleware for Deny {
        fn handle(&self, _request: Request, _next: Next) -> NextFuture<'static> {
            Box::pin(async { Response::with_status(StatusCode::FORBIDDEN).text("denied") })
        }
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let handler_calls = Arc::new(AtomicUsize::new(0));
        let calls = handler_calls.clone();

        let mut server = Server::new();
        server
            .use_middleware("/private", Deny)
            .get("/private/data", move |_req| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Response::ok()
                }
            });
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("GET", "/private/data")).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_middleware_does_not_run_without_a_route() {
        let mut server = Server::new();
        server.use_middleware("*", Stamp("all"));
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("GET", "/nowhere")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert!(!response.headers().contains_key("x-stamp-all"));
    }

    #[test]
    fn test_parse_query_last_wins_and_decodes() {
        let query = parse_query(Some("a=1&b=two%20words&a=3"));
        assert_eq!(query.get("a"), Some(&"3".to_string()));
        assert_eq!(query.get("b"), Some(&"two words".to_string()));
        assert!(parse_query(None).is_empty());
    }

    #[tokio::test]
    async fn test_route_overwrite_last_wins() {
        let mut server = Server::new();
        server.get("/dup", |_req| async { Response::ok().text("first") });
        server.get("/dup", |_req| async { Response::ok().text("second") });
        let inner = server.into_inner();

        let response = inner.dispatch(empty_request("GET", "/dup")).await;
        assert_eq!(body_text(&response), "second");
    }
}
