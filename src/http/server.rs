//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the admin API and the dispatch fallback
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests through the live route table, serving files for
//!   file routes
//! - Apply route updates from the config watcher
//! - Observability (metrics, correlation IDs)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::ServerConfig;
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::HttpError;
use crate::http::table::{Files, RouteTable};
use crate::observability::metrics;
use crate::routing::{Handler, Method, RouterError, WILDCARD_PARAM};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// The live table; readers load it, reloads store a new one.
    pub table: Arc<ArcSwap<RouteTable>>,
    pub api_key: Arc<str>,
    /// Route tables published since startup.
    pub reloads: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(table: RouteTable, api_key: &str) -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
            api_key: api_key.into(),
            reloads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build a table from `config` and publish it. On failure the current
    /// table stays in place.
    pub fn apply(&self, config: &ServerConfig) -> Result<(), RouterError> {
        let table =
            RouteTable::from_config(config).inspect_err(|_| metrics::record_reload("rejected"))?;
        let routes = table.router().routes().len();

        self.table.store(Arc::new(table));
        self.reloads.fetch_add(1, Ordering::Relaxed);

        metrics::record_reload("applied");
        metrics::set_route_count(routes);
        tracing::info!(routes, "Route table reloaded");
        Ok(())
    }
}

/// HTTP server for the router service.
pub struct HttpServer {
    app: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ServerConfig) -> Result<Self, RouterError> {
        let table = RouteTable::from_config(config)?;
        metrics::set_route_count(table.router().routes().len());

        let state = AppState::new(table, &config.admin.api_key);
        let app = Self::build_router(config, state.clone());
        Ok(Self { app, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut app = Router::new();
        if config.admin.enabled {
            app = app.merge(admin::router(state.clone()));
        }

        // Outermost first: the ID exists before the span opens.
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        app.fallback(dispatch).with_state(state).layer(middleware)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires, applying every config
    /// received on `config_updates` in the meantime.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.apply(&config) {
                    tracing::error!(error = %e, "Rejected route update, keeping current routes");
                }
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// What `dispatch` does once the lookup is done.
enum Reply<'t> {
    Ready(Response),
    Files(&'t Files, String),
}

/// Resolve the request against the live table.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let table = state.table.load_full();
    let router = table.router();
    let method = request.method().clone();

    let (reply, route) = {
        let path = request.uri().path();
        let mut values = router.param_buffer();
        let m = router.resolve(method.as_str().parse::<Method>().ok(), path, &mut values);

        match m.handler {
            Handler::Found(endpoint) => {
                let params = m.params(&values);
                let reply = match &endpoint.files {
                    Some(files) => Reply::Files(
                        files,
                        params.get(WILDCARD_PARAM).unwrap_or_default().to_string(),
                    ),
                    None => Reply::Ready(endpoint.respond(m.pattern, &params)),
                };
                (reply, endpoint.name.as_str())
            }
            Handler::MethodNotAllowed => {
                let allowed = m.allowed();
                tracing::debug!(%method, path, pattern = m.pattern, "Method not allowed");
                (
                    Reply::Ready(HttpError::method_not_allowed(allowed).into_response()),
                    "none",
                )
            }
            Handler::NotFound => {
                tracing::debug!(%method, path, "No route matched");
                (Reply::Ready(HttpError::not_found().into_response()), "none")
            }
        }
    };

    let response = match reply {
        Reply::Ready(response) => response,
        Reply::Files(files, tail) => files.serve(&tail, request).await,
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), route, start);
    response
}
