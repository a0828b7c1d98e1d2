//! Queries for the `documents` and `location_history` tables.
//!
//! Movement writes (`record_movement`, and the seed entry inside
//! `create_document`) update the `current_location` pointer and append the
//! history row inside one transaction, so no reader ever observes one
//! without the other.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<Option<Document>, AppError> {
    let doc = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, protocol_number, kind, notary, done, created_by,
               current_location, notes, qr_image, created_at, updated_at
        FROM documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doc)
}

pub async fn find_by_protocol(
    pool: &SqlitePool,
    protocol_number: &str,
) -> Result<Option<Document>, AppError> {
    let doc = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, protocol_number, kind, notary, done, created_by,
               current_location, notes, qr_image, created_at, updated_at
        FROM documents
        WHERE protocol_number = ?
        "#,
    )
    .bind(protocol_number)
    .fetch_optional(pool)
    .await?;

    Ok(doc)
}

/// Lists documents matching the filter, newest first.
///
/// The WHERE clause is built dynamically from the filter fields that are
/// present; substring filters use LIKE, exact filters bind the enum code.
pub async fn list_documents(
    pool: &SqlitePool,
    filter: &DocumentFilter,
) -> Result<Vec<Document>, AppError> {
    let mut query = String::from(
        r#"
        SELECT id, protocol_number, kind, notary, done, created_by,
               current_location, notes, qr_image, created_at, updated_at
        FROM documents
        WHERE 1 = 1
        "#,
    );
    let mut bindings: Vec<String> = Vec::new();

    if let Some(number) = &filter.protocol_number {
        query.push_str(" AND protocol_number LIKE ?");
        bindings.push(format!("%{}%", number));
    }

    if let Some(notary) = filter.notary {
        query.push_str(" AND notary = ?");
        bindings.push(notary.as_str().to_string());
    }

    if let Some(kind) = filter.kind {
        query.push_str(" AND kind = ?");
        bindings.push(kind.as_str().to_string());
    }

    if let Some(done) = filter.done {
        query.push_str(" AND done = ?");
        bindings.push(if done { "1" } else { "0" }.to_string());
    }

    if let Some(location) = &filter.location {
        query.push_str(" AND current_location LIKE ?");
        bindings.push(format!("%{}%", location));
    }

    query.push_str(" ORDER BY created_at DESC");

    let mut query_builder = sqlx::query_as::<_, Document>(&query);
    for binding in &bindings {
        query_builder = query_builder.bind(binding);
    }

    let docs = query_builder.fetch_all(pool).await?;
    Ok(docs)
}

/// Inserts a new document and seeds its movement history with the creator's
/// desk, in one transaction. A duplicate protocol number surfaces as
/// `Conflict` even if it slipped past the caller's pre-check.
pub async fn create_document(
    pool: &SqlitePool,
    id: &str,
    protocol_number: &str,
    kind: DocumentKind,
    notary: Notary,
    created_by: &str,
    desk: &str,
) -> Result<Document, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO documents (id, protocol_number, kind, notary, created_by, current_location)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(protocol_number)
    .bind(kind)
    .bind(notary)
    .bind(created_by)
    .bind(desk)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict("Protocol number already exists".to_string());
            }
        }
        AppError::from(e)
    })?;

    sqlx::query(
        r#"
        INSERT INTO location_history (document_id, place, actor)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(desk)
    .bind(created_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_document(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created document".to_string()))
}

/// Appends a history entry and moves the `current_location` pointer to
/// `place`, atomically. Returns `None` when the document does not exist.
pub async fn record_movement(
    pool: &SqlitePool,
    id: &str,
    actor: &str,
    place: &str,
) -> Result<Option<Document>, AppError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE documents
        SET current_location = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(place)
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    sqlx::query(
        r#"
        INSERT INTO location_history (document_id, place, actor)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(place)
    .bind(actor)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_document(pool, id).await
}

/// Full movement trail for a document, oldest entry first.
pub async fn list_history(
    pool: &SqlitePool,
    document_id: &str,
) -> Result<Vec<LocationEntry>, AppError> {
    let entries = sqlx::query_as::<_, LocationEntry>(
        r#"
        SELECT place, actor, recorded_at
        FROM location_history
        WHERE document_id = ?
        ORDER BY id
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn update_notes(
    pool: &SqlitePool,
    id: &str,
    notes: &str,
) -> Result<Option<Document>, AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE documents
        SET notes = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    get_document(pool, id).await
}

pub async fn set_done(
    pool: &SqlitePool,
    id: &str,
    done: bool,
) -> Result<Option<Document>, AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE documents
        SET done = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(done)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    get_document(pool, id).await
}

/// Stores the rendered QR data URL. Called from the background generation
/// task after creation, so it deliberately does not touch `updated_at`.
pub async fn set_qr_image(pool: &SqlitePool, id: &str, data_url: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE documents SET qr_image = ? WHERE id = ?")
        .bind(data_url)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
