use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::Utc;
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::clients::ObjectStore;
use crate::error::AppError;
use crate::orders::{
    self, filter_orders, paginate, DateFilter, Order, OrderFilters, ORDER_FETCH_LIMIT,
};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_filter: DateFilter,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    50
}

/// The upstream API cannot filter, so one large page is fetched and the
/// filters run in memory before slicing out the requested page. Only the
/// returned page is decorated with presigned URLs.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Value>, AppError> {
    let response = state
        .api
        .fetch_orders(0, ORDER_FETCH_LIMIT)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch orders", e))?;
    let all_orders = orders::parse_items(&response);

    let filters = OrderFilters {
        search: query.search,
        status: query.status,
        date_filter: query.date_filter,
    };
    let filtered = filter_orders(&all_orders, &filters, Utc::now());
    let page = paginate(&filtered, query.page, query.page_size);
    let items = decorate_orders(&state.store, page.items).await;

    Ok(Json(json!({
        "items": items,
        "total": page.total,
        "page": page.page,
        "pageSize": page.page_size,
        "totalPages": page.total_pages,
    })))
}

/// Attaches presigned preview/design URLs. The fan-out is concurrent and
/// unordered; results are recombined by array position. A presigning failure
/// drops that URL, never the order.
async fn decorate_orders(store: &ObjectStore, orders: Vec<&Order>) -> Vec<Value> {
    let tasks = orders.into_iter().map(|order| async move {
        let mut value = serde_json::to_value(order).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            if let Some(preview) = &order.preview {
                match store.order_asset_url(preview).await {
                    Ok(url) => {
                        map.insert("previewUrl".to_string(), Value::String(url));
                    }
                    Err(err) => error!(error = %err, "failed to presign order preview"),
                }
            }
            if let Some(design) = &order.design {
                match store.order_asset_url(design).await {
                    Ok(url) => {
                        map.insert("designUrl".to_string(), Value::String(url));
                    }
                    Err(err) => error!(error = %err, "failed to presign order design"),
                }
            }
        }
        value
    });
    join_all(tasks).await
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let order = state
        .api
        .fetch_order(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch order", e))?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    Ok(Json(order))
}

/// Fire-and-forget proxy; the upstream system owns the status transition and
/// no local precondition is checked.
pub async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .api
        .complete_order(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to complete order", e))?;
    Ok(Json(result))
}
