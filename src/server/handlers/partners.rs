use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::orders::{self, SalesReport, SALES_FETCH_LIMIT};
use crate::partners::normalize_revenue_share;
use crate::server::app::AppState;

pub async fn list_partners(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let partners = state
        .api
        .fetch_partners()
        .await
        .map_err(|e| AppError::upstream("Failed to fetch partners", e))?;
    Ok(Json(partners))
}

pub async fn create_partner(
    State(state): State<AppState>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    normalize_revenue_share(&mut body);
    let partner = state
        .api
        .create_partner(&body)
        .await
        .map_err(|e| AppError::upstream("Failed to create partner", e))?;
    Ok((StatusCode::CREATED, Json(partner)))
}

pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let partner = state
        .api
        .fetch_partner(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch partner", e))?
        .ok_or_else(|| AppError::not_found("Partner not found"))?;
    Ok(Json(partner))
}

pub async fn update_partner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    normalize_revenue_share(&mut body);
    let partner = state
        .api
        .update_partner(&id, &body)
        .await
        .map_err(|e| AppError::upstream("Failed to update partner", e))?;
    Ok(Json(partner))
}

pub async fn delete_partner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .api
        .delete_partner(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to delete partner", e))?;
    Ok(Json(json!({ "success": true })))
}

/// Monthly revenue-share report: the upstream API cannot filter by
/// affiliate, so one large page is fetched and the aggregation runs locally.
pub async fn partner_sales(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SalesReport>, AppError> {
    let response = state
        .api
        .fetch_orders(0, SALES_FETCH_LIMIT)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch partner sales", e))?;
    let all_orders = orders::parse_items(&response);
    Ok(Json(orders::partner_sales(&all_orders, &id)))
}
