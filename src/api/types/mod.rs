//! HTTP request, response and error types

pub mod ai;
pub mod error;
pub mod json;

pub use ai::{
    GenerateRequest, GenerateResponse, ObjectRequest, ObjectResponse, ProviderStatusResponse,
};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
