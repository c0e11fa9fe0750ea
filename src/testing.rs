//! Test support utilities

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};

static NEXT_PORT: AtomicU16 = AtomicU16::new(45900);

/// Allocate a localhost port for a test server.
/// Ports are handed out sequentially so parallel tests do not collide.
pub fn get_test_port() -> u16 {
    NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

/// Create a test socket address on a fresh port
pub fn test_socket_addr() -> SocketAddr {
    format!("127.0.0.1:{}", get_test_port()).parse().unwrap()
}
