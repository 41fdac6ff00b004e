//! HTTP routes
//!
//! Public routes serve the site; `/api/admin` routes need a bearer token
//! from `/api/admin/login`, except the recovery steps which exist for when
//! the password is lost.

pub mod admin;
pub mod public;
pub mod recovery;
pub mod remote;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Routes without middleware
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health))
        .route("/api/content", get(public::content))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route(
            "/api/admin/content",
            get(admin::content).patch(admin::update_content),
        )
        .route("/api/admin/reset", post(admin::reset))
        .route("/api/admin/entries/{list}", post(admin::create_entry))
        .route("/api/admin/credentials", put(admin::change_credentials))
        .route(
            "/api/admin/remote",
            get(remote::status)
                .post(remote::connect)
                .delete(remote::disconnect),
        )
        .route("/api/admin/recovery/request", post(recovery::request))
        .route("/api/admin/recovery/verify", post(recovery::verify))
        .route("/api/admin/recovery/complete", post(recovery::complete))
}
