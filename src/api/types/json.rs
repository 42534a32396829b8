//! JSON body extractor whose rejections use the API error payload

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

pub const INVALID_BODY: &str = "Invalid JSON body";

/// JSON body extractor that ignores `Content-Type`.
///
/// A body that cannot be parsed is rejected with
/// `500 {"error": "Invalid JSON body", "details": ...}`; handlers retitle the
/// error with [`ApiError::with_error`] to name the failed operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::new(rejection.status(), "Failed to read request body")
                .with_details(rejection.body_text())
        })?;

        serde_json::from_slice(&body)
            .map(Json)
            .map_err(|e| ApiError::internal(INVALID_BODY).with_details(e.to_string()))
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
