//! Registration errors.

use thiserror::Error;

/// Errors raised while registering routes.
///
/// Lookups never fail: a request that matches nothing yields
/// [`Handler::NotFound`](super::Handler::NotFound) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The verb is not one of DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT.
    #[error("unsupported method: {0}")]
    UnknownMethod(String),

    /// The pattern cannot be inserted into the tree.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },
}

impl RouterError {
    pub(crate) fn invalid(pattern: &str, reason: &'static str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }
}
