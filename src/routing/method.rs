//! HTTP verbs and the fixed per-verb handler table.
//!
//! # Design Decisions
//! - Closed set of verbs: anything else is rejected at registration time
//! - One slot per verb, indexed by discriminant (no map lookup per node)

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::RouterError;

/// A verb the router can register handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl Method {
    /// Every supported verb, in slot order.
    pub const ALL: [Method; 7] = [
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouterError;

    /// Verbs are case-sensitive, as on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RouterError::UnknownMethod(s.to_string()))
    }
}

/// Handler slots for a single tree node.
#[derive(Debug, Clone)]
pub struct MethodHandlers<H> {
    slots: [Option<H>; 7],
}

impl<H> Default for MethodHandlers<H> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<H> MethodHandlers<H> {
    /// Store `handler` for `method`, returning the one it replaces.
    pub fn insert(&mut self, method: Method, handler: H) -> Option<H> {
        self.slots[method.slot()].replace(handler)
    }

    pub fn get(&self, method: Method) -> Option<&H> {
        self.slots[method.slot()].as_ref()
    }

    /// True when no verb has a handler here.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Verbs with a handler, in slot order.
    pub fn allowed(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL
            .into_iter()
            .filter(move |m| self.slots[m.slot()].is_some())
    }
}
