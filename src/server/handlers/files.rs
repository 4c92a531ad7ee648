use axum::extract::{Multipart, State};
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::server::app::AppState;

/// Re-packages an inbound multipart request for reqwest so it can be
/// forwarded verbatim to the admin API.
pub(crate) async fn multipart_to_form(
    mut multipart: Multipart,
) -> Result<reqwest::multipart::Form, AppError> {
    let mut form = reqwest::multipart::Form::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart payload: {e}")))?;

        let mut part = reqwest::multipart::Part::bytes(data.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| AppError::validation(format!("Invalid content type: {e}")))?;
        }
        form = form.part(name, part);
    }
    Ok(form)
}

/// Forwards the multipart body to the admin API, which owns the actual
/// storage decision.
pub async fn forward_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let form = multipart_to_form(multipart).await?;
    let result = state
        .api
        .forward_file_upload(form)
        .await
        .map_err(|e| AppError::upstream("Failed to upload file", e))?;
    Ok(Json(result))
}

pub async fn invalidate_cache(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .api
        .forward_cache_invalidation(&body)
        .await
        .map_err(|e| AppError::upstream("Failed to invalidate cache", e))?;
    Ok(Json(result))
}

pub async fn download_url(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let bucket = body.get("bucket").and_then(Value::as_str);
    let key = body.get("key").and_then(Value::as_str);
    let (Some(bucket), Some(key)) = (bucket, key) else {
        return Err(AppError::validation("Missing required fields: bucket or key"));
    };

    let url = state
        .store
        .download_url(bucket, key)
        .await
        .map_err(|e| AppError::upstream("Failed to generate download URL", e))?;

    Ok(Json(json!({
        "success": true,
        "url": url,
        "bucket": bucket,
        "key": key,
    })))
}
