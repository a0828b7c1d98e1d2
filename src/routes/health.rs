//! Liveness probe.
//!
//! `GET /api/v1/health` → `{ "status": "ok" }`

use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
