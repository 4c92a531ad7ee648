use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::server::app::AppState;

pub async fn list_assets(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let assets = state
        .api
        .fetch_render_assets()
        .await
        .map_err(|e| AppError::upstream("Failed to fetch render assets", e))?;
    Ok(Json(assets))
}

pub async fn create_asset(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let asset = state
        .api
        .create_render_asset(&body)
        .await
        .map_err(|e| AppError::upstream("Failed to create render asset", e))?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Created or updated by key; the upstream store decides which.
pub async fn upsert_asset(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let asset = state
        .api
        .upsert_render_asset(&body)
        .await
        .map_err(|e| AppError::upstream("Failed to upsert render asset", e))?;
    Ok(Json(asset))
}

// Keys are PSD paths like "backdrop/backdrop.psd"; they arrive URL-escaped
// and axum hands them over decoded.

pub async fn get_asset(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let asset = state
        .api
        .fetch_render_asset(&key)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch render asset", e))?
        .ok_or_else(|| AppError::not_found("Render asset not found"))?;
    Ok(Json(asset))
}

pub async fn update_asset(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let asset = state
        .api
        .update_render_asset(&key, &body)
        .await
        .map_err(|e| AppError::upstream("Failed to update render asset", e))?;
    Ok(Json(asset))
}

pub async fn delete_asset(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .api
        .delete_render_asset(&key)
        .await
        .map_err(|e| AppError::upstream("Failed to delete render asset", e))?;
    Ok(Json(json!({ "success": true })))
}
