//! HTTP surface for Namebook: the HTML shell plus the JSON names API.
//!
//! # Responsibility
//! - Map `GET /api/names` and `POST /api/names` onto `namebook_core`.
//! - Issue per-session anti-forgery tokens and enforce them on writes.
//!
//! # Invariants
//! - Handlers never touch SQLite outside `AppState::with_service`.
//! - Every unsafe request on `/api/*` passes `CsrfLayer` first.

#![forbid(unsafe_code)]

pub mod config;
pub mod csrf;
pub mod error;
pub mod handlers;
pub mod shell;
pub mod state;

use axum::routing::get;
use axum::Router;

pub use config::ServerConfig;
pub use csrf::{
    CsrfLayer, CsrfTokens, CSRF_HEADER, CSRF_MISMATCH_STATUS, MAX_SESSIONS, SESSION_COOKIE,
    SESSION_LIFETIME,
};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/names",
            get(handlers::list_names_handler).post(handlers::create_name_handler),
        )
        .route_layer(CsrfLayer::new(state.csrf()));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/assets/app.js", get(handlers::app_js_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .merge(api)
        .with_state(state)
}
