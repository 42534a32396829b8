//! AI generation endpoints

pub mod generate;
pub mod object;
pub mod stream;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub use generate::summary_message;

/// Create the `/api/ai` router
pub fn create_ai_router() -> Router<AppState> {
    Router::new()
        .route(
            "/generate",
            get(generate::provider_status).post(generate::generate_text),
        )
        .route("/stream", post(stream::stream_text))
        .route("/object", post(object::generate_object))
}
