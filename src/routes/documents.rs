//! Document route handlers.
//!
//! ## Endpoints
//! - `GET    /api/v1/documents`                → filterable listing (admin)
//! - `POST   /api/v1/documents`                → register a new document
//! - `GET    /api/v1/documents/{id}`           → detail with movement history
//! - `GET    /api/v1/documents/{id}/locations` → caller's permitted scan targets
//! - `PUT    /api/v1/documents/{id}/notes`     → update free-text notes
//! - `PATCH  /api/v1/documents/{id}/done`      → completion flag (admin)

use crate::{
    db,
    db::users as db_users,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
    pub base_url: String,
}

const MAX_PROTOCOL_NUMBER_LEN: usize = 50;
const MAX_NOTES_LEN: usize = 255;

/// Loads the authenticated user's record. Tokens outlive accounts, so a
/// missing row is treated as an expired session.
pub(crate) async fn current_user(state: &AppState, auth: &AuthUser) -> Result<User, AppError> {
    db_users::find_by_id(&state.pool, &auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized("User no longer exists".to_string()))
}

/// Document ids are UUIDs; anything else is rejected before touching the
/// database.
pub(crate) fn parse_document_id(id: &str) -> Result<(), AppError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| AppError::InvalidReference("Malformed document id".to_string()))
}

/// `POST /documents` — registers a physical document.
///
/// Seeds the movement history with the registering user's desk and kicks off
/// QR generation in the background.
pub async fn create_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let user = current_user(&state, &auth_user).await?;

    if !matches!(user.role, Role::Admin | Role::Officer | Role::CopyClerk) {
        return Err(AppError::Forbidden(
            "Your role cannot register documents".to_string(),
        ));
    }

    let protocol_number = req.protocol_number.trim().to_string();
    if protocol_number.is_empty() || protocol_number.chars().count() > MAX_PROTOCOL_NUMBER_LEN {
        return Err(AppError::Validation("Invalid protocol number".to_string()));
    }

    if db::find_by_protocol(&state.pool, &protocol_number)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Protocol number already exists".to_string(),
        ));
    }

    let id = Uuid::now_v7().to_string();
    let document = db::create_document(
        &state.pool,
        &id,
        &protocol_number,
        req.kind,
        req.notary,
        &user.name,
        &user.desk,
    )
    .await?;

    // QR generation must never fail the registration: render it after the
    // response and leave qr_image empty if anything goes wrong.
    let pool = state.pool.clone();
    let base_url = state.base_url.clone();
    let document_id = document.id.clone();
    tokio::spawn(async move {
        match services::qr::generate_data_url(&base_url, &document_id) {
            Ok(data_url) => {
                if let Err(e) = db::set_qr_image(&pool, &document_id, &data_url).await {
                    tracing::warn!("Failed to store QR image for {}: {}", document_id, e);
                }
            }
            Err(e) => tracing::warn!("QR generation failed for {}: {}", document_id, e),
        }
    });

    Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents` — admin listing with optional filters
/// (`protocol_number`, `notary`, `kind`, `done`, `location`).
pub async fn list_documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state, &auth_user).await?;
    if user.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only administrators may list documents".to_string(),
        ));
    }

    let documents = db::list_documents(&state.pool, &filter).await?;
    Ok(Json(json!({ "documents": documents })))
}

/// `GET /documents/{id}` — full record including the movement history.
pub async fn get_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DocumentWithHistory>, AppError> {
    current_user(&state, &auth_user).await?;
    parse_document_id(&id)?;

    let document = db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let location_history = db::list_history(&state.pool, &id).await?;

    Ok(Json(DocumentWithHistory {
        document,
        location_history,
    }))
}

/// `GET /documents/{id}/locations` — the scan targets the caller's role may
/// set for this document. Clients render their menu from this list, so menu
/// and authorization share one source.
pub async fn list_location_options(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state, &auth_user).await?;
    parse_document_id(&id)?;

    let document = db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let options: Vec<Value> = services::location::menu_for(user.role)
        .iter()
        .map(|option| {
            json!({
                "option": option.code(),
                "resolves_to": option.resolve(Some(document.notary)),
            })
        })
        .collect();

    Ok(Json(json!({ "options": options })))
}

/// `PUT /documents/{id}/notes` — any authenticated user may annotate a
/// document. Notes are length-bounded and angle brackets are stripped so
/// they can never smuggle markup into the UI.
pub async fn update_notes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateNotesRequest>,
) -> Result<Json<Value>, AppError> {
    current_user(&state, &auth_user).await?;
    parse_document_id(&id)?;

    if req.notes.chars().count() > MAX_NOTES_LEN {
        return Err(AppError::Validation(
            "Notes must be at most 255 characters".to_string(),
        ));
    }

    let sanitized = req.notes.trim().replace(['<', '>'], "");

    let document = db::update_notes(&state.pool, &id, &sanitized)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({ "message": "Notes updated", "document": document })))
}

/// `PATCH /documents/{id}/done` — completion flag, admin only.
pub async fn update_done(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDoneRequest>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state, &auth_user).await?;
    if user.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only administrators may change the completion flag".to_string(),
        ));
    }
    parse_document_id(&id)?;

    let document = db::set_done(&state.pool, &id, req.done)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({ "message": "Document updated", "document": document })))
}
