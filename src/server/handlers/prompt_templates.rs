use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::server::app::AppState;

use super::files::multipart_to_form;

pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let templates = state
        .api
        .fetch_prompt_templates()
        .await
        .map_err(|e| AppError::upstream("Failed to fetch prompt templates", e))?;
    Ok(Json(templates))
}

pub async fn create_template(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let template = state
        .api
        .create_prompt_template(&body)
        .await
        .map_err(|e| AppError::upstream("Failed to create prompt template", e))?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let template = state
        .api
        .fetch_prompt_template(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch prompt template", e))?
        .ok_or_else(|| AppError::not_found("Prompt template not found"))?;
    Ok(Json(template))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let template = state
        .api
        .update_prompt_template(&id, &body)
        .await
        .map_err(|e| AppError::upstream("Failed to update prompt template", e))?;
    Ok(Json(template))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .api
        .delete_prompt_template(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to delete prompt template", e))?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub image_keys: Option<Vec<String>>,
}

/// Validates locally, then forwards the prompt and the S3 image keys; the
/// backend fetches the images itself.
pub async fn test_prompt(
    State(state): State<AppState>,
    Json(body): Json<TestPromptRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = body.prompt.unwrap_or_default();
    let image_keys = body.image_keys.unwrap_or_default();
    if prompt.is_empty() || image_keys.is_empty() {
        return Err(AppError::validation(
            "Prompt and at least one image are required",
        ));
    }

    let result = state
        .api
        .test_prompt(&json!({ "prompt": prompt, "imageKeys": image_keys }))
        .await
        .map_err(|e| AppError::upstream("Failed to test prompt", e))?;
    Ok(Json(result))
}

/// Forwards the example before/after images as multipart to the admin API.
pub async fn save_example(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let form = multipart_to_form(multipart).await?;
    let template = state
        .api
        .save_prompt_example(&id, form)
        .await
        .map_err(|e| AppError::upstream("Failed to save prompt example", e))?;
    Ok(Json(template))
}
