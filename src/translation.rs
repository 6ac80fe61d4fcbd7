use crate::cache::TranslationCache;
use crate::config::Config;
use crate::i18n::{Language, MetricsReport, TranslationMetrics};
use crate::markup::MarkupGuard;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_CLIENT_ID: &str = "gtx";

/// Why a request produced no translation. Never returned to callers of
/// `translate`; every variant degrades to the original text.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation endpoint returned {0}")]
    Status(StatusCode),

    #[error("unexpected translation response shape: {0}")]
    Shape(&'static str),
}

/// Client for a Google-Translate-style `translate_a/single` endpoint.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
    cache: Arc<TranslationCache>,
    metrics: Arc<TranslationMetrics>,
    guard: MarkupGuard,
}

impl TranslationClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        cache: Arc<TranslationCache>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            cache,
            metrics: Arc::new(TranslationMetrics::new()),
            guard: MarkupGuard::new(),
        }
    }

    /// Build a client, HTTP timeout and cache from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.translate_timeout_secs))
            .build()?;
        let cache = Arc::new(TranslationCache::new(
            config.translation_cache_capacity,
            config.translation_cache_ttl,
        ));

        Ok(Self::new(http, config.translate_api_url.clone(), cache)
            .with_client_id(config.translate_client_id.clone()))
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Translate `text` into `target`.
    ///
    /// Never fails: on any transport, status or shape problem the original
    /// text is returned unchanged. Successful results are cached by exact
    /// `(text, target)`. Very short inputs are often echoed back by the
    /// endpoint; an echo is accepted and cached like any other result.
    pub async fn translate(&self, text: &str, target: Language) -> String {
        match self.try_translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Translation to {} failed, showing original: {}", target, e);
                text.to_string()
            }
        }
    }

    /// Like `translate`, but reports why no translation was produced instead
    /// of falling back. Failures are counted and never cached.
    pub async fn try_translate(
        &self,
        text: &str,
        target: Language,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        if let Some(cached) = self.cache.get(text, target) {
            self.metrics.record_cache_hit();
            debug!("Translation cache hit ({} chars, {})", text.len(), target);
            return Ok(cached);
        }
        self.metrics.record_cache_miss();

        self.metrics.record_api_call();
        match self.request_translation(text, target).await {
            Ok(translated) => {
                self.cache.insert(text, target, translated.clone());
                Ok(translated)
            }
            Err(e) => {
                self.metrics.record_api_failure();
                Err(e)
            }
        }
    }

    /// Translate text containing markup, keeping every tag intact.
    pub async fn translate_markup(&self, markup: &str, target: Language) -> String {
        match self.try_translate_markup(markup, target).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Translation to {} failed, showing original: {}", target, e);
                markup.to_string()
            }
        }
    }

    pub async fn try_translate_markup(
        &self,
        markup: &str,
        target: Language,
    ) -> Result<String, TranslationError> {
        let protected = self.guard.encode(markup);
        let translated = self.try_translate(&protected, target).await?;
        Ok(self.guard.decode(&translated))
    }

    async fn request_translation(
        &self,
        text: &str,
        target: Language,
    ) -> Result<String, TranslationError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("client", self.client_id.as_str()),
                ("sl", "auto"),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status));
        }

        let body: Value = response.json().await?;
        parse_segments(&body)
    }
}

/// Concatenate `body[0][i][0]` for every segment whose first element is a string.
fn parse_segments(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or(TranslationError::Shape("missing segment list"))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(TranslationError::Shape("no translated segments"));
    }

    Ok(translated)
}
