//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::AiService;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub ai_service: Arc<AiService>,
}

impl AppState {
    pub fn new(ai_service: Arc<AiService>) -> Self {
        Self { ai_service }
    }
}
