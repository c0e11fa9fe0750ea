//! Response abstraction for building HTTP responses

pub mod response;

pub use response::{Response, ResponseBody};
