//! Admin API: inspect the live route table.
//!
//! Mounted under `/_admin` when `admin.enabled` is set. Every endpoint
//! requires `Authorization: Bearer <admin.api_key>`. Admin paths take
//! precedence over configured routes.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/_admin/status", get(get_status))
        .route("/_admin/routes", get(get_routes))
        .route("/_admin/match", get(get_match))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
