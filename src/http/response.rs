//! Error responses.
//!
//! # Responsibilities
//! - Map routing outcomes without a handler to HTTP status codes
//! - Attach `Allow` to 405 responses
//!
//! # Design Decisions
//! - Plain-text bodies; the status line carries the meaning

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::routing::Method;

/// An error answered directly by the server.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
    allow: Vec<Method>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            allow: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "No matching route found")
    }

    /// 405 listing the verbs the matched path does accept.
    pub fn method_not_allowed(allow: Vec<Method>) -> Self {
        Self {
            allow,
            ..Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn allow_header(&self) -> Option<HeaderValue> {
        if self.allow.is_empty() {
            return None;
        }
        let verbs: Vec<_> = self.allow.iter().map(|m| m.as_str()).collect();
        HeaderValue::from_str(&verbs.join(", ")).ok()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let allow = self.allow_header();
        let mut response = (self.status, self.message).into_response();
        if let Some(allow) = allow {
            response.headers_mut().insert(header::ALLOW, allow);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let response = HttpError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[test]
    fn test_method_not_allowed_lists_verbs() {
        let err = HttpError::method_not_allowed(vec![Method::Get, Method::Put]);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, PUT");
    }
}
