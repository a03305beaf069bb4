//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router
//! service. All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub admin: AdminConfig,

    /// Routes registered at the root.
    pub routes: Vec<RouteConfig>,

    /// Routes registered under a shared prefix.
    pub groups: Vec<GroupConfig>,
}

impl ServerConfig {
    /// Every configured route with its full pattern, top-level routes first,
    /// then groups in file order.
    pub fn all_routes(&self) -> Vec<(String, &RouteConfig)> {
        let top = self.routes.iter().map(|r| (r.path.clone(), r));
        let grouped = self.groups.iter().flat_map(|g| {
            g.routes
                .iter()
                .map(move |r| (format!("{}{}", g.prefix, r.path), r))
        });
        top.chain(grouped).collect()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human oriented.
    #[default]
    Pretty,
    Compact,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the `/_admin` endpoints.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
        }
    }
}

/// A single route: a pattern, the verbs it answers and what it returns.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Route name, used by the admin API and URL generation.
    pub name: String,

    #[serde(default = "default_methods")]
    pub methods: Vec<String>,

    /// Pattern, e.g. `/users/:id/files/*`.
    pub path: String,

    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body. `{name}` is replaced by the parameter `name`, `{*}` by
    /// the wildcard capture. Without a body the match is described as JSON.
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,

    /// Serve this file instead of a body.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Serve files from this directory, looked up by the `*` capture.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

fn default_status() -> u16 {
    200
}

/// Routes sharing a path prefix.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GroupConfig {
    pub prefix: String,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}
