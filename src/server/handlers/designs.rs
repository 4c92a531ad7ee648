use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::server::app::AppState;

pub async fn list_designs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let designs = state
        .api
        .fetch_designs()
        .await
        .map_err(|e| AppError::upstream("Failed to fetch designs", e))?;
    Ok(Json(designs))
}

pub async fn create_design(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let design = state
        .api
        .create_design(&body)
        .await
        .map_err(|e| AppError::upstream("Failed to create design", e))?;
    Ok((StatusCode::CREATED, Json(design)))
}

pub async fn get_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let design = state
        .api
        .fetch_design(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch design", e))?
        .ok_or_else(|| AppError::not_found("Design not found"))?;
    Ok(Json(design))
}

pub async fn update_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let design = state
        .api
        .update_design(&id, &body)
        .await
        .map_err(|e| AppError::upstream("Failed to update design", e))?;
    Ok(Json(design))
}

pub async fn delete_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .api
        .delete_design(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to delete design", e))?;
    Ok(Json(json!({
        "success": true,
        "message": "Design deleted successfully"
    })))
}
