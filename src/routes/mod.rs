//! HTTP route handlers and router assembly.
//!
//! - `auth`: login, token refresh, logout, profile, admin account creation
//! - `documents`: registration, listing, detail, notes, completion flag
//! - `scan`: QR scan and archive mutations
//! - `health`: liveness probe

pub mod auth;
pub mod documents;
pub mod health;
pub mod scan;

pub use documents::*;
pub use health::*;
pub use scan::*;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

/// Builds the API router. `main` nests this under `/api/v1`; tests drive it
/// directly.
pub fn app_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    Router::new()
        .merge(auth_routes)
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/{id}", get(get_document))
        .route("/documents/{id}/locations", get(list_location_options))
        .route("/documents/{id}/notes", put(update_notes))
        .route("/documents/{id}/done", patch(update_done))
        .route("/scan", post(scan_document))
        .route("/archive", post(archive_document))
        .route("/health", get(health_check))
        .with_state(state)
}
