//! Provider clients for Gemini and the chat-completions family (DeepSeek, OpenAI)

mod chat_completions;
mod dispatch;
mod gemini;
mod http_client;
mod sse;

pub use chat_completions::{ChatCompletionsClient, DEFAULT_DEEPSEEK_BASE_URL, DEFAULT_OPENAI_BASE_URL};
pub use dispatch::{HttpTextGenerator, ProviderEndpoints};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL};
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
