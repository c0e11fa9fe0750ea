//! Server lifecycle - the accept loop, connection serving, and shutdown

use super::server::ServerInner;
use crate::errors::{HttpError, HttpResult};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Bind the listener and serve connections until a shutdown signal arrives.
///
/// Every accepted connection runs on its own task; a panicking handler kills
/// at most that connection. Registration state is behind an `Arc` snapshot
/// and is never mutated while serving.
pub(crate) async fn serve(addr: SocketAddr, inner: Arc<ServerInner>) -> HttpResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| HttpError::startup(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("✅ Server listening on {}", addr);

    let keep_alive = inner.config.keep_alive;
    let shutdown_grace = inner.config.shutdown_timeout();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut connections: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, remote)) => {
                        let inner = inner.clone();
                        connections.spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(move |req: hyper::Request<Incoming>| {
                                let inner = inner.clone();
                                async move {
                                    let response = inner.dispatch(req).await;
                                    Ok::<_, Infallible>(response.into_hyper())
                                }
                            });

                            if let Err(err) = http1::Builder::new()
                                .keep_alive(keep_alive)
                                .serve_connection(io, service)
                                .await
                            {
                                debug!("Connection error from {}: {}", remote, err);
                            }
                        });
                    }
                    Err(err) => warn!("Failed to accept connection: {}", err),
                }
            }
            // Reap finished connection tasks as we go
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut shutdown => break,
        }
    }

    drop(listener);

    if !connections.is_empty() {
        info!(
            "⏳ Waiting up to {:?} for {} open connection(s)",
            shutdown_grace,
            connections.len()
        );
        let drain = async {
            while connections.join_next().await.is_some() {}
        };
        if tokio::time::timeout(shutdown_grace, drain).await.is_err() {
            warn!("Shutdown timeout elapsed with connections still open");
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("📡 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            warn!("📡 Received terminate signal, shutting down gracefully...");
        },
    }
}
