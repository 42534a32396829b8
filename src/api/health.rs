//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::ai::summary_message;
use super::state::AppState;
use crate::api::types::Json;

/// Detailed health response with component status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Individual component health check
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Returns 200 with the running version
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check. Missing credentials degrade the service but it still
/// answers, so the status stays 200.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let providers_check = check_providers(&state);
    let status = providers_check.status;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![providers_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn check_providers(state: &AppState) -> HealthCheck {
    let providers = state.ai_service.configured_providers();

    HealthCheck {
        name: "ai_providers".to_string(),
        status: if providers.is_empty() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        },
        message: Some(summary_message(&providers)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::create_router;
    use crate::domain::ai::ScriptedGenerator;
    use crate::domain::{AiProvider, ProviderCredentials, ProviderRegistry, StaticCredentialSource};
    use crate::infrastructure::services::AiService;

    fn state(credentials: ProviderCredentials) -> AppState {
        let registry = ProviderRegistry::new(Arc::new(StaticCredentialSource::new(credentials)));
        AppState::new(Arc::new(AiService::new(
            registry,
            Arc::new(ScriptedGenerator::new()),
        )))
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Option<Value>) {
        let response = create_router(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }

    #[tokio::test]
    async fn test_health_and_live() {
        let (status, body) = get(state(ProviderCredentials::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
        assert!(body.get("checks").is_none());

        let (status, _) = get(state(ProviderCredentials::new()), "/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_degraded_without_providers() {
        let (status, body) = get(state(ProviderCredentials::new()), "/ready").await;
        let body = body.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("degraded"));
        assert_eq!(body["checks"][0]["name"], json!("ai_providers"));
        assert_eq!(body["checks"][0]["status"], json!("degraded"));
    }

    #[tokio::test]
    async fn test_ready_healthy_with_provider() {
        let credentials = ProviderCredentials::new().with_key(AiProvider::Gemini, "g");
        let (status, body) = get(state(credentials), "/ready").await;
        let body = body.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(
            body["checks"][0]["message"],
            json!("1 AI provider(s) configured: gemini")
        );
    }
}
