//! Radix tree nodes.
//!
//! A node owns a compressed path fragment (`prefix`), its children and the
//! handlers of the route terminating at it. Children are unique by
//! `(label, kind)`; a node has at most one param child and one wildcard child.

use std::fmt;
use std::mem;

use super::MethodHandlers;

/// What a node matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A literal fragment, compared byte-for-byte.
    Static,
    /// A named segment, matching up to the next `/`.
    Param,
    /// The remainder of the path, `/` included. Always a leaf.
    Wildcard,
}

#[derive(Debug)]
pub struct Node<H> {
    pub(crate) kind: Kind,
    pub(crate) label: u8,
    pub(crate) prefix: Vec<u8>,
    pub(crate) children: Vec<Node<H>>,
    pub(crate) handlers: MethodHandlers<H>,
    /// Registered pattern, empty unless a route terminates here.
    pub(crate) pattern: String,
    pub(crate) param_names: Vec<String>,
}

impl<H> Node<H> {
    pub(crate) fn new(kind: Kind, prefix: &[u8]) -> Self {
        Self {
            kind,
            label: prefix.first().copied().unwrap_or_default(),
            prefix: prefix.to_vec(),
            children: Vec::new(),
            handlers: MethodHandlers::default(),
            pattern: String::new(),
            param_names: Vec::new(),
        }
    }

    /// The empty root a tree starts from.
    pub(crate) fn root() -> Self {
        Self::new(Kind::Static, &[])
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }

    pub fn handlers(&self) -> &MethodHandlers<H> {
        &self.handlers
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub(crate) fn static_child(&self, label: u8) -> Option<&Node<H>> {
        self.children
            .iter()
            .find(|c| c.kind == Kind::Static && c.label == label)
    }

    pub(crate) fn param_child(&self) -> Option<&Node<H>> {
        self.children.iter().find(|c| c.kind == Kind::Param)
    }

    pub(crate) fn wildcard_child(&self) -> Option<&Node<H>> {
        self.children.iter().find(|c| c.kind == Kind::Wildcard)
    }

    /// Labels never collide across kinds: `:` and `*` only ever start
    /// param and wildcard nodes.
    pub(crate) fn child_index(&self, label: u8) -> Option<usize> {
        self.children.iter().position(|c| c.label == label)
    }

    pub(crate) fn has_alternatives(&self) -> bool {
        self.children.iter().any(|c| c.kind != Kind::Static)
    }

    /// Bind a route to this node, keeping handlers for other verbs.
    pub(crate) fn attach(&mut self, route: RouteEntry<H>) {
        let RouteEntry {
            method,
            handler,
            pattern,
            param_names,
        } = route;
        self.handlers.insert(method, handler);
        self.pattern = pattern;
        self.param_names = param_names;
    }

    /// Split the node at byte `at`: it keeps `prefix[..at]` and becomes a
    /// static node whose only child carries the suffix together with every
    /// child, handler and route attached before the split.
    pub(crate) fn split(&mut self, at: usize) {
        let suffix = self.prefix.split_off(at);
        let child = Node {
            kind: self.kind,
            label: suffix[0],
            prefix: suffix,
            children: mem::take(&mut self.children),
            handlers: mem::take(&mut self.handlers),
            pattern: mem::take(&mut self.pattern),
            param_names: mem::take(&mut self.param_names),
        };
        self.kind = Kind::Static;
        self.children.push(child);
    }

    pub(crate) fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(
            f,
            "{:indent$}{:?} {:?}",
            "",
            self.kind,
            String::from_utf8_lossy(&self.prefix),
            indent = depth * 2
        )?;
        if !self.handlers.is_empty() {
            let verbs: Vec<_> = self.handlers.allowed().map(|m| m.as_str()).collect();
            write!(f, " [{}] {}", verbs.join(","), self.pattern)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// A route on its way into the tree.
pub(crate) struct RouteEntry<H> {
    pub method: super::Method,
    pub handler: H,
    pub pattern: String,
    pub param_names: Vec<String>,
}
