//! `/api/ai/generate` handlers

use axum::extract::State;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, GenerateRequest, GenerateResponse, Json, ProviderStatusResponse};

/// GET /api/ai/generate
pub async fn provider_status(State(state): State<AppState>) -> Json<ProviderStatusResponse> {
    let providers = state.ai_service.configured_providers();

    Json(ProviderStatusResponse {
        configured: !providers.is_empty(),
        message: summary_message(&providers),
        providers: providers.into_iter().map(String::from).collect(),
    })
}

/// POST /api/ai/generate
pub async fn generate_text(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, ApiError>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = body.map_err(|e| e.with_error("Failed to generate text"))?;
    let prompt = request.prompt().ok_or_else(ApiError::prompt_required)?;

    let providers = state.ai_service.configured_providers();
    if providers.is_empty() {
        return Err(ApiError::no_provider());
    }

    info!(
        providers = %providers.join(", "),
        prompt_len = prompt.len(),
        "Processing text generation request"
    );

    let text = state.ai_service.generate_text(prompt).await.map_err(|e| {
        error!(error = %e, "Text generation failed");
        ApiError::from_generation("Failed to generate text", e)
    })?;

    Ok(Json(GenerateResponse {
        text,
        providers: providers.into_iter().map(String::from).collect(),
    }))
}

/// Human-readable summary of the configured providers
pub fn summary_message(providers: &[&str]) -> String {
    if providers.is_empty() {
        "No AI providers configured. Add OPENAI_API_KEY, DEEPSEEK_API_KEY, or GEMINI_API_KEY to environment variables.".to_string()
    } else {
        format!(
            "{} AI provider(s) configured: {}",
            providers.len(),
            providers.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_message() {
        assert_eq!(
            summary_message(&["gemini", "openai"]),
            "2 AI provider(s) configured: gemini, openai"
        );
        assert_eq!(
            summary_message(&["deepseek"]),
            "1 AI provider(s) configured: deepseek"
        );
        assert!(summary_message(&[]).starts_with("No AI providers configured."));
    }
}
