//! AI client trait and the caching wrapper around concrete providers.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::cache::{AiCache, CacheKey, CacheStats};
use super::config::ConfigError;
use super::types::{ChatRequest, ChatResponse};

/// Errors from AI operations.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    Api(String),

    #[error("API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("offline mode: no cached response for {0}")]
    OfflineNotCached(String),

    #[error("failed to parse AI response: {0}")]
    ParseError(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Trait for AI completion providers.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send a completion request. The prompt name identifies the operation
    /// for caching and logging.
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError>;

    /// Short provider name for logging.
    fn client_name(&self) -> &'static str;

    /// The model this client sends requests to.
    fn model_name(&self) -> &str;
}

/// Wraps a concrete provider with disk caching, an offline gate, and
/// client-side rate limiting.
pub struct CachingAiClient {
    inner: Box<dyn AiClient>,
    cache: AiCache,
    offline: bool,
    rate_limit_ms: u64,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl CachingAiClient {
    pub fn new(
        inner: Box<dyn AiClient>,
        cache_dir: PathBuf,
        offline: bool,
        rate_limit_ms: u64,
    ) -> Self {
        Self {
            inner,
            cache: AiCache::new(cache_dir),
            offline,
            rate_limit_ms,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Remove every cached response.
    pub fn clear_cache(&self) -> std::io::Result<()> {
        self.cache.clear()
    }

    /// Sleep long enough to keep at least `rate_limit_ms` between requests.
    async fn rate_limit(&self) {
        if self.rate_limit_ms == 0 {
            return;
        }

        let mut last = self.last_request.lock().await;
        if let Some(last_time) = *last {
            let min_interval = Duration::from_millis(self.rate_limit_ms);
            let elapsed = last_time.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl AiClient for CachingAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let key = CacheKey::new(prompt_name, self.inner.model_name(), &request.messages);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(prompt = prompt_name, "AI cache hit");
            return Ok(cached.into());
        }

        if self.offline {
            return Err(AiError::OfflineNotCached(prompt_name.to_string()));
        }

        self.rate_limit().await;

        tracing::debug!(
            prompt = prompt_name,
            client = self.inner.client_name(),
            model = self.inner.model_name(),
            "sending AI request"
        );

        let model = self.inner.model_name().to_string();
        let response = self.inner.complete(prompt_name, request).await?;

        // Cache writes are best-effort; a full disk should not fail the request.
        if let Err(e) = self.cache.put(&key, &response, &model) {
            tracing::warn!(error = %e, prompt = prompt_name, "failed to write AI cache entry");
        }

        Ok(response)
    }

    fn client_name(&self) -> &'static str {
        self.inner.client_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
