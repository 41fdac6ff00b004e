//! # Folio Server
//!
//! HTTP API over the Folio content store.
//!
//! Visitors read `GET /api/content`. The admin panel logs in at
//! `/api/admin/login` and edits through the `/api/admin` routes with the
//! returned bearer token. See [`routes`] for the full list.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod view;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Cli, Command, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
