//! Request context and body acquisition

pub mod body;
pub mod cookies;
pub mod request;

pub use body::{acquire, RequestBody};
pub use cookies::parse_cookies;
pub use request::Request;
