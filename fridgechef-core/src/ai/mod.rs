//! AI client module for recipe suggestion via OpenRouter or Gemini.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `CachingAiClient` wrapper with disk-based caching
//! - Configuration via environment variables
//! - Prompt templates for recipe suggestion
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `FRIDGECHEF_AI_PROVIDER` (optional): "openrouter" (default), "gemini", or "fake"
//! - `OPENROUTER_API_KEY`: API key, required for the openrouter provider
//! - `GEMINI_API_KEY`: API key, required for the gemini provider
//! - `FRIDGECHEF_AI_MODEL` (optional): Model name, e.g., "openai/gpt-4o-mini"
//! - `FRIDGECHEF_AI_BASE_URL` (optional): API base URL
//! - `FRIDGECHEF_AI_CACHE_DIR` (optional): Cache directory path
//! - `FRIDGECHEF_AI_OFFLINE` (optional): Set to "true" to use cache only
//! - `FRIDGECHEF_AI_RATE_LIMIT_MS` (optional): Delay between requests in ms
//!
//! # Example
//!
//! ```ignore
//! use fridgechef_core::ai::{self, AiClient, ChatMessage, ChatRequest};
//!
//! let client = ai::create_client_from_env()?;
//!
//! let request = ChatRequest {
//!     messages: vec![ChatMessage::user("Hello!")],
//!     ..Default::default()
//! };
//!
//! let response = client.complete("test", request).await?;
//! println!("Response: {}", response.content);
//! ```

mod cache;
mod client;
mod config;
mod fake;
mod gemini;
mod openrouter;
pub mod prompts;
mod types;

pub use cache::{AiCache, CacheKey, CacheStats, CachedAiResponse};
pub use client::{AiClient, AiError, CachingAiClient};
pub use config::{AiConfig, AiProvider, ConfigError};
pub use fake::{FakeAiClient, DEMO_RECIPES_JSON};
pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse, ImageData, Role, Usage};

/// Create the configured provider from environment variables, wrapped with
/// disk caching.
pub fn create_client_from_env() -> Result<CachingAiClient, AiError> {
    let config = AiConfig::from_env()?;
    Ok(create_client(&config))
}

/// Create a caching client from an explicit configuration.
pub fn create_client(config: &AiConfig) -> CachingAiClient {
    let inner: Box<dyn AiClient> = match config.provider {
        AiProvider::OpenRouter => Box::new(OpenRouterClient::new(config)),
        AiProvider::Gemini => Box::new(GeminiClient::new(config)),
        AiProvider::Fake => Box::new(FakeAiClient::default()),
    };

    CachingAiClient::new(
        inner,
        config.cache_dir.clone(),
        config.offline,
        config.rate_limit_ms,
    )
}
