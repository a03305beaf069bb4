//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing, dispatch and reload produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty, compact or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span (tower-http)
//! - Metrics are cheap: without an installed recorder the macros are no-ops

pub mod logging;
pub mod metrics;
