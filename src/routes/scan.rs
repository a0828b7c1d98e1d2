//! Scan and archive handlers — the two mutations that move documents.
//!
//! ## Endpoints
//! - `POST /api/v1/scan`    → record a movement for the scanned document
//! - `POST /api/v1/archive` → send a document to the archive (copy desk only)

use super::documents::{current_user, parse_document_id, AppState};
use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::location,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `POST /scan` — appends a history entry and moves the current-location
/// pointer. The target comes from the request for menu roles and from the
/// role policy otherwise.
pub async fn scan_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ScanRequest>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state, &auth_user).await?;
    parse_document_id(&req.document_id)?;

    let document = db::get_document(&state.pool, &req.document_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let place = location::resolve_target(
        user.role,
        req.target_place.as_deref(),
        &user.desk,
        Some(document.notary),
    )?;

    let document = db::record_movement(&state.pool, &req.document_id, &user.name, &place)
        .await?
        .ok_or(AppError::NotFound)?;
    let location_history = db::list_history(&state.pool, &document.id).await?;

    Ok(Json(json!({
        "message": format!(
            "Document {} is now at {}",
            document.protocol_number, document.current_location
        ),
        "document": {
            "protocol_number": document.protocol_number,
            "current_location": document.current_location,
            "location_history": location_history,
        }
    })))
}

/// `POST /archive` — shorthand for moving a document to ARCHIVE. The role
/// check runs before any mutation; a forbidden call leaves state untouched.
pub async fn archive_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ArchiveRequest>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state, &auth_user).await?;

    if user.role != Role::CopyClerk {
        return Err(AppError::Forbidden(
            "Only the copy desk may archive documents".to_string(),
        ));
    }

    parse_document_id(&req.document_id)?;

    let document =
        db::record_movement(&state.pool, &req.document_id, &user.name, location::ARCHIVE)
            .await?
            .ok_or(AppError::NotFound)?;
    let location_history = db::list_history(&state.pool, &document.id).await?;

    Ok(Json(json!({
        "message": format!("Document {} archived", document.protocol_number),
        "document": {
            "protocol_number": document.protocol_number,
            "current_location": document.current_location,
            "location_history": location_history,
        }
    })))
}
