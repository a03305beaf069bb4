//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → table.rs (router lookup against the live table)
//!     → endpoint response or served file, or response.rs (404 / 405 with Allow)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod table;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::HttpError;
pub use server::{AppState, HttpServer};
pub use table::{Endpoint, Files, MatchReport, Outcome, RouteTable};
