use axum::extract::{Multipart, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::AppError;
use crate::server::app::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Direct upload to object storage: multipart fields `file`, `bucket`, `key`.
/// After a successful PUT the matching CDN path is invalidated in the
/// background; an invalidation failure is logged but does not fail the
/// upload.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut bucket: Option<String> = None;
    let mut key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid multipart payload: {e}")))?;
                file = Some((data.to_vec(), content_type));
            }
            "bucket" => {
                bucket = field.text().await.ok().filter(|v| !v.is_empty());
            }
            "key" => {
                key = field.text().await.ok().filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let (Some((data, content_type)), Some(bucket), Some(key)) = (file, bucket, key) else {
        return Err(AppError::validation("File, bucket, and key are required"));
    };

    state
        .store
        .upload(&bucket, &key, data, &content_type)
        .await
        .map_err(|e| AppError::upstream("Failed to upload file", e))?;

    let cdn = state.cdn.clone();
    let invalidation_path = format!("/{key}");
    tokio::spawn(async move {
        if let Err(err) = cdn.invalidate(&invalidation_path).await {
            warn!(error = %err, "cache invalidation after upload failed");
        }
    });

    Ok(Json(json!({
        "success": true,
        "key": key,
        "bucket": bucket,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignQuery {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Issues a presigned PUT so the browser uploads directly to object storage
/// instead of proxying bytes through this service.
pub async fn presign_upload(
    State(state): State<AppState>,
    Query(query): Query<PresignQuery>,
) -> Result<Json<Value>, AppError> {
    let file_name = query
        .file_name
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation("Missing required parameter: fileName"))?;
    let content_type = query
        .content_type
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation("Missing required parameter: contentType"))?;
    let bucket = query
        .bucket
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| state.config.buckets.designs.clone());

    let key = format!("uploads/{file_name}");
    let upload_url = state
        .store
        .upload_url(&bucket, &key, &content_type)
        .await
        .map_err(|e| AppError::upstream("Failed to generate presigned URL", e))?;

    let file_url = format!(
        "https://{bucket}.s3.{}.amazonaws.com/{key}",
        state.config.aws_region
    );

    Ok(Json(json!({
        "success": true,
        "uploadUrl": upload_url,
        "fileUrl": file_url,
        "key": key,
        "bucket": bucket,
    })))
}
