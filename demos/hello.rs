//! Minimal sprocket application
//!
//! Run with: cargo run --example hello

use sprocket::{init_logging, LoggingConfig, RequestLogger, Response, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging(LoggingConfig::development())?;

    let mut server = Server::new();
    server
        .use_middleware("*", RequestLogger::new())
        .get("/", |_req| async { Response::ok().text("hello from sprocket") })
        .get("/greet", |req| async move {
            let name = req
                .query_param("name")
                .cloned()
                .unwrap_or_else(|| "world".to_string());
            Response::ok().text(format!("hello, {}!", name))
        });

    server.group("/api", |api| {
        api.get("/status", |_req| async {
            Response::ok().json_value(serde_json::json!({"status": "ok"}))
        });
        api.post("/echo", |req| async move {
            match req.body_json() {
                Some(value) => Response::ok().json_value(value.clone()),
                None => Response::bad_request().text("send some JSON"),
            }
        });
    });

    server.listen("127.0.0.1:3000").await?;
    Ok(())
}
