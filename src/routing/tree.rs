//! Route registration and lookup.
//!
//! # Responsibilities
//! - Parse route patterns into static / param / wildcard insertions
//! - Maintain radix compression by splitting nodes on divergence
//! - Track the largest parameter count (sizes per-request buffers)
//! - Resolve (method, path) to a handler, 405 or 404
//!
//! # Design Decisions
//! - Registration takes `&mut self`, lookups `&self`: a built router is
//!   shared read-only between workers, reloads publish a new one
//! - Lookup writes parameter values into a caller-owned buffer, borrowing
//!   from the request path (no per-request allocation for params)
//! - Dead ends backtrack through an explicit stack of choice points, most
//!   recent first

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::node::{Kind, Node, RouteEntry};
use super::{uri, Group, Method, MethodHandlers, Params, RouterError};

/// Parameter name bound to the value captured by a trailing `*`.
pub const WILDCARD_PARAM: &str = "*";

/// Identity of a handler in the route registry, used for URL generation.
pub trait RouteName {
    fn route_name(&self) -> &str;
}

impl RouteName for str {
    fn route_name(&self) -> &str {
        self
    }
}

impl RouteName for String {
    fn route_name(&self) -> &str {
        self
    }
}

impl<T: RouteName + ?Sized> RouteName for &T {
    fn route_name(&self) -> &str {
        (**self).route_name()
    }
}

impl<T: RouteName + ?Sized> RouteName for Arc<T> {
    fn route_name(&self) -> &str {
        (**self).route_name()
    }
}

/// An entry of the append-only route registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub name: String,
}

/// Outcome of a lookup.
#[derive(Debug)]
pub enum Handler<'a, H> {
    Found(&'a H),
    /// Nothing in the tree matches the path.
    NotFound,
    /// The path matches a route, but not for this method.
    MethodNotAllowed,
}

impl<H> Clone for Handler<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Handler<'_, H> {}

impl<'a, H> Handler<'a, H> {
    pub fn found(self) -> Option<&'a H> {
        match self {
            Handler::Found(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Handler::Found(_))
    }
}

/// Result of [`Router::find`].
///
/// Parameter values live in the buffer passed to `find`; `param_names[i]`
/// names `values[i]`.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub handler: Handler<'a, H>,
    pub pattern: &'a str,
    pub param_names: &'a [String],
    handlers: Option<&'a MethodHandlers<H>>,
}

impl<'a, H> Match<'a, H> {
    fn not_found() -> Self {
        Self {
            handler: Handler::NotFound,
            pattern: "",
            param_names: &[],
            handlers: None,
        }
    }

    fn at(node: &'a Node<H>, handler: Handler<'a, H>) -> Self {
        Self {
            handler,
            pattern: &node.pattern,
            param_names: &node.param_names,
            handlers: Some(&node.handlers),
        }
    }

    /// Verbs registered at the matched node; feeds the `Allow` header of a 405.
    pub fn allowed(&self) -> Vec<Method> {
        self.handlers
            .map(|h| h.allowed().collect())
            .unwrap_or_default()
    }

    /// Bind the matched names to the values `find` wrote.
    pub fn params<'v>(&self, values: &'v [&'v str]) -> Params<'v>
    where
        'a: 'v,
    {
        Params::new(self.param_names, values)
    }
}

/// Alternative still to try at a choice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Static,
    Param,
    Wildcard,
}

/// Where to resume after a dead end.
struct Choice<'a, H> {
    node: &'a Node<H>,
    pos: usize,
    bound: usize,
    step: Step,
}

/// A radix tree router over handlers of type `H`.
#[derive(Debug)]
pub struct Router<H> {
    root: Node<H>,
    routes: Vec<Route>,
    max_params: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            root: Node::root(),
            routes: Vec::new(),
            max_params: 0,
        }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest number of parameters of any registered route.
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// A value buffer large enough for any route of this router.
    pub fn param_buffer<'p>(&self) -> Vec<&'p str> {
        vec![""; self.max_params]
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn root(&self) -> &Node<H> {
        &self.root
    }

    /// Generate the path of the first route registered under `name`.
    pub fn uri<D: fmt::Display>(&self, name: &str, params: &[D]) -> Option<String> {
        self.routes
            .iter()
            .find(|r| r.name == name)
            .map(|r| uri::fill_pattern(&r.path, params))
    }

    /// Resolve `method` and `path`.
    ///
    /// Extracted parameter values are written into `values` by position;
    /// slots past the match are left untouched. `values` should hold
    /// [`max_params`](Self::max_params) entries: routes needing more slots
    /// than provided are unreachable for this call.
    pub fn find<'a, 'p>(
        &'a self,
        method: Method,
        path: &'p str,
        values: &mut [&'p str],
    ) -> Match<'a, H> {
        self.resolve(Some(method), path, values)
    }

    /// Like [`find`](Self::find), with `None` standing for a verb outside
    /// the supported set: such a request can only yield a 404 or a 405.
    pub fn resolve<'a, 'p>(
        &'a self,
        method: Option<Method>,
        path: &'p str,
        values: &mut [&'p str],
    ) -> Match<'a, H> {
        let bytes = path.as_bytes();
        let root = &self.root;
        if root.prefix.is_empty() || !bytes.starts_with(&root.prefix) {
            return Match::not_found();
        }

        let handler_of = |node: &'a Node<H>| method.and_then(|m| node.handlers.get(m));

        let mut choices: Vec<Choice<'a, H>> = Vec::new();
        // First node that matched the whole path but lacked this method.
        let mut rejected: Option<&'a Node<H>> = None;

        let mut node = root;
        let mut pos = root.prefix.len();
        let mut bound = 0;
        let mut step = Step::Static;

        loop {
            match step {
                Step::Static if pos == bytes.len() => {
                    if let Some(h) = handler_of(node) {
                        return Match::at(node, Handler::Found(h));
                    }
                    if rejected.is_none() && !node.handlers.is_empty() {
                        rejected = Some(node);
                    }
                    // A trailing `*` also matches the empty remainder.
                    if let Some(wild) = node.wildcard_child() {
                        if bound < values.len() {
                            if let Some(h) = handler_of(wild) {
                                values[bound] = "";
                                return Match::at(wild, Handler::Found(h));
                            }
                            if rejected.is_none() && !wild.handlers.is_empty() {
                                rejected = Some(wild);
                            }
                        }
                    }
                }
                Step::Static => {
                    if let Some(child) = node.static_child(bytes[pos]) {
                        if bytes[pos..].starts_with(&child.prefix) {
                            if node.has_alternatives() {
                                choices.push(Choice {
                                    node,
                                    pos,
                                    bound,
                                    step: Step::Param,
                                });
                            }
                            pos += child.prefix.len();
                            node = child;
                            continue;
                        }
                    }
                    step = Step::Param;
                    continue;
                }
                Step::Param => {
                    if let Some(param) = node.param_child() {
                        let end = bytes[pos..]
                            .iter()
                            .position(|&b| b == b'/')
                            .map_or(bytes.len(), |i| pos + i);
                        if end > pos && bound < values.len() {
                            if node.wildcard_child().is_some() {
                                choices.push(Choice {
                                    node,
                                    pos,
                                    bound,
                                    step: Step::Wildcard,
                                });
                            }
                            values[bound] = &path[pos..end];
                            bound += 1;
                            pos = end;
                            node = param;
                            step = Step::Static;
                            continue;
                        }
                    }
                    step = Step::Wildcard;
                    continue;
                }
                Step::Wildcard => {
                    if let Some(wild) = node.wildcard_child() {
                        if bound < values.len() {
                            values[bound] = &path[pos..];
                            if let Some(h) = handler_of(wild) {
                                return Match::at(wild, Handler::Found(h));
                            }
                            if rejected.is_none() && !wild.handlers.is_empty() {
                                rejected = Some(wild);
                            }
                        }
                    }
                }
            }

            // Dead end: resume at the most recent choice point.
            let Some(choice) = choices.pop() else {
                break;
            };
            node = choice.node;
            pos = choice.pos;
            bound = choice.bound;
            step = choice.step;
        }

        match rejected {
            Some(node) => Match::at(node, Handler::MethodNotAllowed),
            None => Match::not_found(),
        }
    }

    fn insert(&mut self, path: &[u8], kind: Kind, mut route: Option<RouteEntry<H>>) {
        let mut node = &mut self.root;
        let mut search = path;

        loop {
            if node.prefix.is_empty() {
                // Only the root starts out empty.
                node.prefix = search.to_vec();
                node.label = search[0];
                if let Some(route) = route.take() {
                    node.attach(route);
                }
                return;
            }

            let common = search
                .iter()
                .zip(&node.prefix)
                .take_while(|(a, b)| a == b)
                .count();

            if common < node.prefix.len() {
                node.split(common);
                if common == search.len() {
                    if let Some(route) = route.take() {
                        node.attach(route);
                    }
                } else {
                    let mut child = Node::new(kind, &search[common..]);
                    if let Some(route) = route.take() {
                        child.attach(route);
                    }
                    node.children.push(child);
                }
                return;
            }

            if common < search.len() {
                search = &search[common..];
                match node.child_index(search[0]) {
                    Some(i) => {
                        node = &mut node.children[i];
                        continue;
                    }
                    None => {
                        let mut child = Node::new(kind, search);
                        if let Some(route) = route.take() {
                            child.attach(route);
                        }
                        node.children.push(child);
                        return;
                    }
                }
            }

            // The node already exists for this exact path.
            if let Some(route) = route.take() {
                node.attach(route);
            }
            return;
        }
    }

    /// The node whose full stripped path is exactly `path`, if any.
    fn node_at(&self, path: &[u8]) -> Option<&Node<H>> {
        let mut node = &self.root;
        let mut search = path;
        loop {
            search = search.strip_prefix(node.prefix.as_slice())?;
            let Some(&label) = search.first() else {
                return Some(node);
            };
            node = &node.children[node.child_index(label)?];
        }
    }
}

impl<H: RouteName> Router<H> {
    /// Register `handler` for `method` and `pattern`.
    ///
    /// Re-registering the same method and pattern replaces the handler.
    /// Patterns that differ only in parameter names share a node, so the
    /// second one is rejected: `/users/:id` and `/users/:name` cannot both
    /// be registered.
    pub fn add(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouterError> {
        let parsed = ParsedPattern::parse(pattern)?;
        let name = handler.route_name().to_string();

        if let Some(existing) = self.node_at(&parsed.stripped) {
            if !existing.handlers.is_empty() && existing.param_names != parsed.names {
                tracing::debug!(
                    pattern,
                    existing = %existing.pattern,
                    "Conflicting parameter names"
                );
                return Err(RouterError::invalid(pattern, "conflicting parameter names"));
            }
        }

        self.max_params = self.max_params.max(parsed.names.len());

        let (last, rest) = parsed
            .inserts
            .split_last()
            .ok_or_else(|| RouterError::invalid(pattern, "empty pattern"))?;
        for &(end, kind) in rest {
            self.insert(&parsed.stripped[..end], kind, None);
        }
        let (end, kind) = *last;
        self.insert(
            &parsed.stripped[..end],
            kind,
            Some(RouteEntry {
                method,
                handler,
                pattern: pattern.to_string(),
                param_names: parsed.names,
            }),
        );

        tracing::debug!(%method, pattern, name = %name, "Route registered");
        self.routes.push(Route {
            method,
            path: pattern.to_string(),
            name,
        });
        Ok(())
    }

    /// Register with a verb given as text, rejecting unknown verbs.
    pub fn add_verb(&mut self, verb: &str, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add(verb.parse()?, pattern, handler)
    }

    /// Registration helper prefixing every pattern with `prefix`.
    pub fn group(&mut self, prefix: &str) -> Group<'_, H> {
        Group::new(self, prefix)
    }
}

/// Check `pattern` without registering it.
pub fn validate_pattern(pattern: &str) -> Result<(), RouterError> {
    ParsedPattern::parse(pattern).map(|_| ())
}

/// `pattern` with its parameter names removed: `/users/:id/*` becomes
/// `/users/:/*`. Two patterns with the same shape land on the same node.
pub fn pattern_shape(pattern: &str) -> Result<String, RouterError> {
    let parsed = ParsedPattern::parse(pattern)?;
    Ok(String::from_utf8_lossy(&parsed.stripped).into_owned())
}

impl<H> fmt::Display for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_tree(f, 0)
    }
}

/// A pattern reduced to the byte strings inserted into the tree.
///
/// `/users/:id/files/*` strips to `/users/:/files/*` and inserts
/// `/users/` (static), `/users/:` (param), `/users/:/files/` (static)
/// and `/users/:/files/*` (wildcard); the last insertion carries the route.
#[derive(Debug)]
struct ParsedPattern {
    stripped: Vec<u8>,
    inserts: Vec<(usize, Kind)>,
    names: Vec<String>,
}

impl ParsedPattern {
    fn parse(pattern: &str) -> Result<Self, RouterError> {
        let bytes = pattern.as_bytes();
        if bytes.first() != Some(&b'/') {
            return Err(RouterError::invalid(pattern, "must start with '/'"));
        }

        let mut stripped = Vec::with_capacity(bytes.len());
        let mut inserts = Vec::new();
        let mut names: Vec<String> = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b':' => {
                    inserts.push((stripped.len(), Kind::Static));
                    let start = i + 1;
                    let end = bytes[start..]
                        .iter()
                        .position(|&b| b == b'/')
                        .map_or(bytes.len(), |n| start + n);
                    let name = &pattern[start..end];
                    if name.is_empty() {
                        return Err(RouterError::invalid(pattern, "empty parameter name"));
                    }
                    if name.contains([':', '*']) {
                        return Err(RouterError::invalid(
                            pattern,
                            "parameter names cannot contain ':' or '*'",
                        ));
                    }
                    if names.iter().any(|n| n == name) {
                        return Err(RouterError::invalid(pattern, "duplicate parameter name"));
                    }
                    names.push(name.to_string());
                    stripped.push(b':');
                    inserts.push((stripped.len(), Kind::Param));
                    i = end;
                }
                b'*' => {
                    if i + 1 != bytes.len() {
                        return Err(RouterError::invalid(
                            pattern,
                            "'*' is only allowed at the end",
                        ));
                    }
                    inserts.push((stripped.len(), Kind::Static));
                    names.push(WILDCARD_PARAM.to_string());
                    stripped.push(b'*');
                    inserts.push((stripped.len(), Kind::Wildcard));
                    i += 1;
                }
                b => {
                    stripped.push(b);
                    i += 1;
                }
            }
        }

        if inserts.last().map(|&(end, _)| end) != Some(stripped.len()) {
            inserts.push((stripped.len(), Kind::Static));
        }
        Ok(Self {
            stripped,
            inserts,
            names,
        })
    }
}
