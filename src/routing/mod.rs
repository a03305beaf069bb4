//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup / reload):
//!     (method, pattern, handler)
//!     → tree.rs (validate pattern, insert into radix tree, split nodes)
//!     → route registry (introspection, URL generation)
//!     → Freeze as immutable Router, publish via Arc
//!
//! Incoming Request (method, path):
//!     → tree.rs (walk tree: static → param → wildcard, backtrack on dead end)
//!     → params.rs (bind extracted values to names)
//!     → Return: Found(handler) | MethodNotAllowed | NotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, lookups never mutate the tree (thread-safe without locks)
//! - No regex in hot path (byte-wise prefix comparison only)
//! - Deterministic: static beats param beats wildcard at the same position
//! - Parameter values are borrowed from the request path, written into a
//!   caller-owned buffer sized by `Router::max_params`

pub mod error;
pub mod group;
pub mod method;
pub mod node;
pub mod params;
pub mod tree;
pub mod uri;

#[cfg(test)]
mod proptests;

pub use error::RouterError;
pub use group::Group;
pub use method::{Method, MethodHandlers};
pub use params::Params;
pub use tree::{
    pattern_shape, validate_pattern, Handler, Match, Route, RouteName, Router, WILDCARD_PARAM,
};
pub use uri::fill_pattern;
