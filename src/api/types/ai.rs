//! Request and response bodies for the `/api/ai` routes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/ai/generate` and `POST /api/ai/stream`.
///
/// `prompt` is optional so that a missing prompt reaches the handler and gets
/// the same 400 as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

/// Body of `POST /api/ai/object`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub schema: Option<Value>,
}

impl ObjectRequest {
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    /// Configured providers at the time of the request, in fallback order
    pub providers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponse {
    pub object: Value,
    pub providers: Vec<String>,
}

/// Body of `GET /api/ai/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatusResponse {
    pub configured: bool,
    pub providers: Vec<String>,
    pub message: String,
}
