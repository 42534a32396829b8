//! `/api/ai/object` handler

use axum::extract::State;
use serde_json::Value;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ObjectRequest, ObjectResponse};
use crate::domain::JsonSchemaOutput;

/// POST /api/ai/object
pub async fn generate_object(
    State(state): State<AppState>,
    body: Result<Json<ObjectRequest>, ApiError>,
) -> Result<Json<ObjectResponse>, ApiError> {
    let Json(request) = body.map_err(|e| e.with_error("Failed to generate object"))?;
    let prompt = request.prompt().ok_or_else(ApiError::prompt_required)?;
    let schema = request
        .schema
        .clone()
        .ok_or_else(|| ApiError::bad_request("Schema is required"))?;
    let schema = JsonSchemaOutput::<Value>::new(schema)?;

    let providers = state.ai_service.configured_providers();
    if providers.is_empty() {
        return Err(ApiError::no_provider());
    }

    info!(
        providers = %providers.join(", "),
        prompt_len = prompt.len(),
        "Processing object generation request"
    );

    let object: Value = state
        .ai_service
        .generate_object(prompt, &schema)
        .await
        .map_err(|e| {
            error!(error = %e, "Object generation failed");
            ApiError::from_generation("Failed to generate object", e)
        })?;

    Ok(Json(ObjectResponse {
        object,
        providers: providers.into_iter().map(String::from).collect(),
    }))
}
