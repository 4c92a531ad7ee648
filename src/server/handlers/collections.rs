use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::collections::position_updates;
use crate::error::AppError;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "includeInactive", default)]
    pub include_inactive: bool,
}

pub async fn list_collections(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let collections = state
        .api
        .fetch_collections(query.include_inactive)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch collections", e))?;
    Ok(Json(collections))
}

pub async fn get_collection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let collection = state
        .api
        .fetch_collection(&slug)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch collection", e))?
        .ok_or_else(|| AppError::not_found("Collection not found"))?;
    Ok(Json(collection))
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub slugs: Vec<String>,
}

/// Accepts the full slug ordering produced by a drag gesture and persists
/// integer positions for every collection in one batch upstream call.
pub async fn reorder_collections(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<Value>, AppError> {
    if body.slugs.is_empty() {
        return Err(AppError::validation(
            "At least one collection slug is required",
        ));
    }
    let updates = position_updates(&body.slugs);
    let result = state
        .api
        .update_collection_positions(&updates)
        .await
        .map_err(|e| AppError::upstream("Failed to update positions", e))?;
    Ok(Json(result))
}

// The remaining collection mutations have no Lambda endpoint yet.

pub async fn create_collection(Json(_body): Json<Value>) -> Result<Json<Value>, AppError> {
    Err(AppError::not_implemented(
        "Create collection endpoint not yet implemented",
    ))
}

pub async fn update_collection_designs(
    Path(_slug): Path<String>,
    Json(_body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    Err(AppError::not_implemented(
        "Update collection designs endpoint not yet implemented",
    ))
}

pub async fn delete_collection(Path(_slug): Path<String>) -> Result<Json<Value>, AppError> {
    Err(AppError::not_implemented(
        "Delete collection endpoint not yet implemented",
    ))
}

pub async fn toggle_collection(
    Path(_slug): Path<String>,
    Json(_body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    Err(AppError::not_implemented(
        "Toggle collection status endpoint not yet implemented",
    ))
}
