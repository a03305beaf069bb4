use std::sync::atomic::Ordering;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::http::table::MatchReport;
use crate::routing::Route;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
    pub max_params: usize,
    pub reloads: u64,
}

#[derive(Deserialize)]
pub struct MatchQuery {
    #[serde(default = "default_method")]
    pub method: String,
    pub path: String,
}

fn default_method() -> String {
    "GET".to_string()
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let table = state.table.load();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes: table.router().routes().len(),
        max_params: table.router().max_params(),
        reloads: state.reloads.load(Ordering::Relaxed),
    })
}

/// The route registry, in registration order.
pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    Json(state.table.load().router().routes().to_vec())
}

/// Dry-run a lookup without dispatching it.
pub async fn get_match(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> Json<MatchReport> {
    Json(state.table.load().report(&query.method, &query.path))
}
