//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route pattern and verb the router would reject
//! - Validate value ranges (timeouts > 0, addresses parse, status codes)
//! - Detect duplicate route names and duplicate registrations
//! - Detect patterns that differ only in parameter names
//! - Check file routes (one source, wildcard directories, GET/HEAD only)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::{pattern_shape, Method, RouterError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level: unknown level {0:?}")]
    UnknownLogLevel(String),

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingApiKey,

    #[error("route without a name at {0:?}")]
    UnnamedRoute(String),

    #[error("route {0:?} is defined more than once")]
    DuplicateName(String),

    #[error("route {0:?} lists no methods")]
    NoMethods(String),

    #[error("route {route:?}: {source}")]
    Route { route: String, source: RouterError },

    #[error("route {route:?}: invalid status code {status}")]
    InvalidStatus { route: String, status: u16 },

    #[error("route {route:?}: {pattern} conflicts with {existing} registered by {first:?}")]
    ConflictingParams {
        route: String,
        pattern: String,
        existing: String,
        first: String,
    },

    #[error("route {0:?}: body, file and dir are mutually exclusive")]
    ConflictingSources(String),

    #[error("route {0:?}: a dir route must end with '*'")]
    DirWithoutWildcard(String),

    #[error("route {route:?}: files are only served for GET and HEAD, not {method}")]
    FileMethod { route: String, method: Method },

    #[error("{method} {path} is registered by both {first:?} and {second:?}")]
    DuplicateRoute {
        method: Method,
        path: String,
        first: String,
        second: String,
    },
}

/// Check `config` as a whole, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }

    let mut names = HashSet::new();
    // (method, shape, pattern, route name)
    let mut registered: Vec<(Method, String, String, &str)> = Vec::new();

    for (path, route) in config.all_routes() {
        if route.name.is_empty() {
            errors.push(ValidationError::UnnamedRoute(path.clone()));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }
        if route.methods.is_empty() {
            errors.push(ValidationError::NoMethods(route.name.clone()));
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::InvalidStatus {
                route: route.name.clone(),
                status: route.status,
            });
        }
        let sources = [route.body.is_some(), route.file.is_some(), route.dir.is_some()];
        if sources.into_iter().filter(|&set| set).count() > 1 {
            errors.push(ValidationError::ConflictingSources(route.name.clone()));
        }
        if route.dir.is_some() && !path.ends_with('*') {
            errors.push(ValidationError::DirWithoutWildcard(route.name.clone()));
        }
        let shape = match pattern_shape(&path) {
            Ok(shape) => Some(shape),
            Err(source) => {
                errors.push(ValidationError::Route {
                    route: route.name.clone(),
                    source,
                });
                None
            }
        };

        if let Some(shape) = &shape {
            let conflict = registered
                .iter()
                .find(|(_, s, p, _)| s == shape && *p != path);
            if let Some((_, _, existing, first)) = conflict {
                errors.push(ValidationError::ConflictingParams {
                    route: route.name.clone(),
                    pattern: path.clone(),
                    existing: existing.clone(),
                    first: first.to_string(),
                });
                continue;
            }
        }

        for verb in &route.methods {
            let method = match verb.parse::<Method>() {
                Ok(method) => method,
                Err(source) => {
                    errors.push(ValidationError::Route {
                        route: route.name.clone(),
                        source,
                    });
                    continue;
                }
            };
            if (route.file.is_some() || route.dir.is_some())
                && !matches!(method, Method::Get | Method::Head)
            {
                errors.push(ValidationError::FileMethod {
                    route: route.name.clone(),
                    method,
                });
            }
            let Some(shape) = &shape else {
                continue;
            };
            match registered
                .iter()
                .find(|(m, s, _, _)| *m == method && s == shape)
            {
                Some((_, _, _, first)) => errors.push(ValidationError::DuplicateRoute {
                    method,
                    path: path.clone(),
                    first: first.to_string(),
                    second: route.name.clone(),
                }),
                None => registered.push((method, shape.clone(), path.clone(), &route.name)),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
