//! `/api/ai/stream` handler

use std::convert::Infallible;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, GenerateRequest, Json};

/// POST /api/ai/stream
///
/// Chunks are sent as unnamed `data` events. A provider failure becomes an
/// `error` event, and every stream closes with a `done` event.
pub async fn stream_text(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|e| e.with_error("Failed to stream text"))?;
    let prompt = request.prompt().ok_or_else(ApiError::prompt_required)?;

    if !state.ai_service.registry().has_any() {
        return Err(ApiError::no_provider());
    }

    info!(prompt_len = prompt.len(), "Processing text stream request");

    let chunks = state
        .ai_service
        .stream_text(prompt)
        .await
        .map_err(|e| ApiError::from_generation("Failed to stream text", e))?;

    let events = chunks
        .map(|item| match item {
            Ok(chunk) => Event::default().data(strip_cr(&chunk)),
            Err(e) => {
                warn!(error = %e, "Text stream ended with error");
                Event::default().event("error").data(strip_cr(&e.to_string()))
            }
        })
        .chain(stream::once(async { Event::default().event("done").data("[DONE]") }))
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response())
}

/// SSE data may not contain carriage returns
fn strip_cr(text: &str) -> String {
    text.replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_cr() {
        assert_eq!(strip_cr("line one\r\nline two"), "line one\nline two");
        assert_eq!(strip_cr("plain"), "plain");
    }
}
