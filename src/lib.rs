//! Radix tree HTTP router.
//!
//! [`routing`] is the standalone router: register `(method, pattern)`
//! pairs, then resolve requests to a handler, a 405 or a 404. The other
//! modules serve a router built from a TOML file over HTTP.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Method, Router};
