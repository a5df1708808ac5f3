//! Upstream HTTP plumbing: request description and dispatch.

mod dispatcher;
mod error;
mod request;

pub use dispatcher::{AUTH_HEADER, Dispatcher, create_http_client};
pub use error::upstream_message;
pub use request::{Method, QueryValue, RequestSpec};
