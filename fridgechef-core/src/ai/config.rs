//! AI configuration from environment variables.

use std::env;
use thiserror::Error;

/// Default OpenRouter base URL.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default Gemini base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for the OpenRouter provider.
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";

/// Default model for the Gemini provider.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default rate limit between requests in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unknown AI provider: {0} (expected openrouter, gemini, or fake)")]
    UnknownProvider(String),
}

/// Which inference backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenRouter,
    Gemini,
    Fake,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenRouter => "openrouter",
            AiProvider::Gemini => "gemini",
            AiProvider::Fake => "fake",
        }
    }

    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "openrouter" => Ok(AiProvider::OpenRouter),
            "gemini" => Ok(AiProvider::Gemini),
            "fake" => Ok(AiProvider::Fake),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Which backend to talk to.
    pub provider: AiProvider,
    /// API key for the selected provider. Empty for the fake provider.
    pub api_key: String,
    /// Model name (e.g. "openai/gpt-4o-mini", "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Directory for caching responses.
    pub cache_dir: std::path::PathBuf,
    /// If true, only use cache, error if not cached.
    pub offline: bool,
    /// Milliseconds to wait between requests.
    pub rate_limit_ms: u64,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required (per provider):
    /// - `OPENROUTER_API_KEY`: API key when the provider is "openrouter"
    /// - `GEMINI_API_KEY`: API key when the provider is "gemini"
    ///
    /// Optional:
    /// - `FRIDGECHEF_AI_PROVIDER`: "openrouter" | "gemini" | "fake" (default: "openrouter")
    /// - `FRIDGECHEF_AI_MODEL`: Model name (default depends on provider)
    /// - `FRIDGECHEF_AI_BASE_URL`: API base URL (default depends on provider)
    /// - `FRIDGECHEF_AI_CACHE_DIR`: Cache directory (default: "~/.fridgechef/ai-cache")
    /// - `FRIDGECHEF_AI_OFFLINE`: Use cache only (default: false)
    /// - `FRIDGECHEF_AI_RATE_LIMIT_MS`: Rate limit in ms (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("FRIDGECHEF_AI_PROVIDER") {
            Ok(value) => AiProvider::parse(&value)?,
            Err(_) => AiProvider::OpenRouter,
        };

        let api_key = match provider {
            AiProvider::OpenRouter => env::var("OPENROUTER_API_KEY")
                .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?,
            AiProvider::Gemini => env::var("GEMINI_API_KEY")
                .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?,
            AiProvider::Fake => String::new(),
        };

        let model =
            env::var("FRIDGECHEF_AI_MODEL").unwrap_or_else(|_| default_model(provider).to_string());

        let base_url = env::var("FRIDGECHEF_AI_BASE_URL")
            .unwrap_or_else(|_| default_base_url(provider).to_string());

        let cache_dir = env::var("FRIDGECHEF_AI_CACHE_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| Self::default_cache_dir());

        let offline = env::var("FRIDGECHEF_AI_OFFLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let rate_limit_ms = env::var("FRIDGECHEF_AI_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MS);

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            cache_dir,
            offline,
            rate_limit_ms,
        })
    }

    /// Get the default cache directory: ~/.fridgechef/ai-cache
    pub fn default_cache_dir() -> std::path::PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".fridgechef").join("ai-cache"))
            .unwrap_or_else(|| std::path::PathBuf::from("data/ai-cache"))
    }
}

fn default_model(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::OpenRouter => DEFAULT_OPENROUTER_MODEL,
        AiProvider::Gemini => DEFAULT_GEMINI_MODEL,
        AiProvider::Fake => "fake-model",
    }
}

fn default_base_url(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::OpenRouter => DEFAULT_OPENROUTER_BASE_URL,
        AiProvider::Gemini => DEFAULT_GEMINI_BASE_URL,
        AiProvider::Fake => "",
    }
}
