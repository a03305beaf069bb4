//! Prefix groups and verb-named registration helpers.

use super::{Method, RouteName, Router, RouterError};

/// Registers routes under a common path prefix.
///
/// Groups nest: `router.group("/api").group("/v1")` registers under
/// `/api/v1`.
pub struct Group<'r, H> {
    router: &'r mut Router<H>,
    prefix: String,
}

impl<'r, H: RouteName> Group<'r, H> {
    pub(crate) fn new(router: &'r mut Router<H>, prefix: &str) -> Self {
        Self {
            router,
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn add(&mut self, method: Method, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        let pattern = format!("{}{}", self.prefix, path);
        self.router.add(method, &pattern, handler)?;
        Ok(self)
    }

    pub fn delete(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Delete, path, handler)
    }

    pub fn get(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Get, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Head, path, handler)
    }

    pub fn options(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Options, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Patch, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.add(Method::Put, path, handler)
    }

    /// Register `handler` under `path` for each verb in `methods`.
    pub fn on(&mut self, methods: &[Method], path: &str, handler: H) -> Result<&mut Self, RouterError>
    where
        H: Clone,
    {
        for &method in methods {
            self.add(method, path, handler.clone())?;
        }
        Ok(self)
    }

    /// Register `handler` under `path` for every supported verb.
    pub fn any(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError>
    where
        H: Clone,
    {
        self.on(&Method::ALL, path, handler)
    }

    pub fn group(&mut self, prefix: &str) -> Group<'_, H> {
        Group {
            router: &mut *self.router,
            prefix: format!("{}{}", self.prefix, prefix),
        }
    }
}
