//! Route table: the router built from configuration.
//!
//! # Responsibilities
//! - Register every configured route (groups included) into a [`Router`]
//! - Turn a match into a response (templated body, file, or JSON description)
//! - Describe a lookup for the admin API and the CLI
//!
//! # Design Decisions
//! - A table is immutable once built; reloads build a new one
//! - One `Arc<Endpoint>` is shared by all verbs of a route

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::{RouteConfig, ServerConfig};
use crate::http::response::HttpError;
use crate::routing::{Handler, Method, Params, RouteName, Router, RouterError};

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// What a configured route answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub status: u16,
    pub body: Option<String>,
    pub content_type: Option<String>,
    pub files: Option<Files>,
}

/// Files served by a route.
#[derive(Debug, Clone, PartialEq)]
pub enum Files {
    /// One file, whatever the path.
    File(PathBuf),
    /// A directory; the `*` capture names the file inside it.
    Dir(PathBuf),
}

impl RouteName for Endpoint {
    fn route_name(&self) -> &str {
        &self.name
    }
}

impl From<&RouteConfig> for Endpoint {
    fn from(route: &RouteConfig) -> Self {
        Self {
            name: route.name.clone(),
            status: route.status,
            body: route.body.clone(),
            content_type: route.content_type.clone(),
            files: match (&route.file, &route.dir) {
                (Some(file), _) => Some(Files::File(file.clone())),
                (None, Some(dir)) => Some(Files::Dir(dir.clone())),
                (None, None) => None,
            },
        }
    }
}

/// JSON body of a matched route without a configured body.
#[derive(Debug, Serialize)]
struct MatchedRoute<'a> {
    route: &'a str,
    pattern: &'a str,
    params: BTreeMap<&'a str, &'a str>,
}

impl Endpoint {
    pub fn respond(&self, pattern: &str, params: &Params<'_>) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let Some(template) = &self.body else {
            let body = MatchedRoute {
                route: &self.name,
                pattern,
                params: params.iter().collect(),
            };
            return (status, Json(body)).into_response();
        };

        let content_type = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        (
            status,
            [(header::CONTENT_TYPE, content_type)],
            render_template(template, params),
        )
            .into_response()
    }
}

impl Files {
    /// Serve `request`. `tail` is the `*` capture, used by directories.
    pub async fn serve(&self, tail: &str, request: Request<Body>) -> Response {
        let result = match self {
            Files::File(path) => ServeFile::new(path).oneshot(request).await,
            Files::Dir(dir) => {
                let (mut parts, body) = request.into_parts();
                parts.uri = match format!("/{tail}").parse::<Uri>() {
                    Ok(uri) => uri,
                    Err(_) => {
                        return HttpError::new(StatusCode::BAD_REQUEST, "invalid file path")
                            .into_response()
                    }
                };
                ServeDir::new(dir)
                    .oneshot(Request::from_parts(parts, body))
                    .await
            }
        };
        match result {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        }
    }
}

/// Replace `{name}` with the value of parameter `name`. Braces that do not
/// enclose a parameter name are kept as written, so JSON bodies work.
pub fn render_template(template: &str, params: &Params<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| Some((params.get(&after[..close])?, close)));
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Found,
    NotFound,
    MethodNotAllowed,
}

/// A lookup, described.
#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub method: String,
    pub path: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<Method>,
}

/// The live routing state of the server.
#[derive(Debug, Default)]
pub struct RouteTable {
    router: Router<Arc<Endpoint>>,
}

impl RouteTable {
    /// Build the table. `config` is expected to be validated; the first
    /// registration error aborts the build.
    pub fn from_config(config: &ServerConfig) -> Result<Self, RouterError> {
        let mut router = Router::new();

        register(&mut router, "", &config.routes)?;
        for group in &config.groups {
            register(&mut router, &group.prefix, &group.routes)?;
        }

        tracing::debug!(
            routes = router.routes().len(),
            max_params = router.max_params(),
            "Route table built"
        );
        Ok(Self { router })
    }

    pub fn router(&self) -> &Router<Arc<Endpoint>> {
        &self.router
    }

    /// Look up `method` and `path` and describe the result. Verbs outside
    /// the supported set can only end in `not_found` or
    /// `method_not_allowed`.
    pub fn report(&self, method: &str, path: &str) -> MatchReport {
        let mut values = self.router.param_buffer();
        let m = self
            .router
            .resolve(method.parse().ok(), path, &mut values);

        let mut report = MatchReport {
            method: method.to_string(),
            path: path.to_string(),
            outcome: Outcome::NotFound,
            route: None,
            pattern: None,
            params: BTreeMap::new(),
            allowed: Vec::new(),
        };
        match m.handler {
            Handler::Found(endpoint) => {
                report.outcome = Outcome::Found;
                report.route = Some(endpoint.name.clone());
                report.pattern = Some(m.pattern.to_string());
                report.params = m
                    .params(&values)
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
            }
            Handler::MethodNotAllowed => {
                report.outcome = Outcome::MethodNotAllowed;
                report.pattern = Some(m.pattern.to_string());
                report.allowed = m.allowed();
            }
            Handler::NotFound => {}
        }
        report
    }
}

fn register(
    router: &mut Router<Arc<Endpoint>>,
    prefix: &str,
    routes: &[RouteConfig],
) -> Result<(), RouterError> {
    let mut group = router.group(prefix);
    for route in routes {
        let methods = route
            .methods
            .iter()
            .map(|m| m.parse::<Method>())
            .collect::<Result<Vec<_>, _>>()?;
        group.on(&methods, &route.path, Arc::new(Endpoint::from(route)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn table() -> RouteTable {
        let config = parse_config(
            r#"
            [[routes]]
            name = "home"
            path = "/"
            body = "welcome"

            [[groups]]
            prefix = "/api"

            [[groups.routes]]
            name = "user"
            methods = ["GET", "PUT"]
            path = "/users/:id"
            body = "user {id}"

            [[groups.routes]]
            name = "files"
            path = "/files/*"
            "#,
        )
        .unwrap();
        RouteTable::from_config(&config).unwrap()
    }

    #[test]
    fn test_routes_registered_per_method() {
        let table = table();
        let routes: Vec<_> = table
            .router()
            .routes()
            .iter()
            .map(|r| (r.method, r.path.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                (Method::Get, "/", "home"),
                (Method::Get, "/api/users/:id", "user"),
                (Method::Put, "/api/users/:id", "user"),
                (Method::Get, "/api/files/*", "files"),
            ]
        );
        assert_eq!(
            table.router().uri("user", &[7]).as_deref(),
            Some("/api/users/7")
        );
    }

    #[test]
    fn test_report_found() {
        let report = table().report("GET", "/api/files/a/b.txt");
        assert_eq!(report.outcome, Outcome::Found);
        assert_eq!(report.route.as_deref(), Some("files"));
        assert_eq!(report.pattern.as_deref(), Some("/api/files/*"));
        assert_eq!(report.params.get("*").map(String::as_str), Some("a/b.txt"));
    }

    #[test]
    fn test_report_method_not_allowed() {
        let report = table().report("DELETE", "/api/users/9");
        assert_eq!(report.outcome, Outcome::MethodNotAllowed);
        assert_eq!(report.allowed, vec![Method::Get, Method::Put]);

        let report = table().report("BREW", "/api/users/9");
        assert_eq!(report.outcome, Outcome::MethodNotAllowed);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "method_not_allowed");
        assert_eq!(json["allowed"], serde_json::json!(["GET", "PUT"]));
        assert!(json.get("params").is_none());
    }

    #[test]
    fn test_report_not_found() {
        let report = table().report("GET", "/nowhere");
        assert_eq!(report.outcome, Outcome::NotFound);
        assert!(report.route.is_none());
        assert!(report.allowed.is_empty());
    }

    #[test]
    fn test_render_template() {
        let names = vec!["id".to_string(), "*".to_string()];
        let values = ["42", "a/b"];
        let params = Params::new(&names, &values);

        assert_eq!(render_template("user {id}", &params), "user 42");
        assert_eq!(render_template("{*}:{id}", &params), "a/b:42");
        assert_eq!(render_template("{missing} {id}", &params), "{missing} 42");
        assert_eq!(render_template("open {id", &params), "open {id");
        assert_eq!(render_template("plain", &params), "plain");
        assert_eq!(
            render_template(r#"{"id":"{id}"}"#, &params),
            r#"{"id":"42"}"#
        );
    }

    #[test]
    fn test_respond_uses_status_and_content_type() {
        let endpoint = Endpoint {
            name: "created".into(),
            status: 201,
            body: Some("{\"id\":\"{id}\"}".into()),
            content_type: Some("application/json".into()),
            files: None,
        };
        let names = vec!["id".to_string()];
        let values = ["7"];
        let response = endpoint.respond("/things/:id", &Params::new(&names, &values));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let plain = Endpoint {
            content_type: None,
            ..endpoint
        };
        let response = plain.respond("/things/:id", &Params::new(&names, &values));
        assert_eq!(response.headers()[header::CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_files_serve() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(root.path().join("css")).unwrap();
        std::fs::write(root.path().join("css/site.css"), "body {}").unwrap();

        let get = |uri: &str| Request::get(uri).body(Body::empty()).unwrap();

        let file = Files::File(root.path().join("index.html"));
        let response = file.serve("", get("/anything")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<h1>home</h1>");

        let dir = Files::Dir(root.path().to_path_buf());
        let response = dir.serve("css/site.css", get("/static/css/site.css")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let response = dir.serve("", get("/static/")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = dir.serve("missing.txt", get("/static/missing.txt")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = dir.serve("../index.html", get("/static/../index.html")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
