//! Content transformation contract.
//!
//! A generative service rewrites lesson text into simplified, dyslexia-friendly and
//! ADHD-chunked variants. The service is an opaque collaborator behind [`Transformer`];
//! [`TransformService`] adds request validation, per-client rate limiting, readability
//! metrics, and a deterministic fallback so callers always get content back.

use crate::storage::{SessionStore, TRANSFORM_CACHE_PREFIX};
use crate::text::{complexity_reduction_percent, flesch_reading_ease};
use crate::util::clock::Clock;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Longest accepted input, in whitespace-separated words
pub const MAX_WORDS: usize = 2000;

/// Fallback summaries keep this many characters
pub const SUMMARY_CHARS: usize = 200;

pub const RATE_LIMIT_MAX: u32 = 10;
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhdChunk {
    pub section_title: String,
    pub content: String,
    pub key_point: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub word: String,
    pub simple_meaning: String,
}

/// Structured result of a transformation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedContent {
    pub simplified_version: String,
    pub dyslexia_version: String,
    pub adhd_chunked_version: Vec<AdhdChunk>,
    pub key_terms: Vec<KeyTerm>,
    pub summary: String,
    pub difficulty_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed_complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_reduction: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusDuration {
    Short,
    #[default]
    Medium,
    Long,
}

impl FocusDuration {
    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short focus",
            Self::Medium => "Medium focus",
            Self::Long => "Long focus",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Simpler,
    #[default]
    Standard,
    AsIs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_duration: Option<FocusDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<TransformProfile>,
}

/// Error body returned to callers instead of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text cannot be empty")]
    EmptyText,
    #[error("Text too long. Maximum 2000 words allowed.")]
    TooLong { words: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Transformation service unavailable: {0}")]
    Unavailable(String),
    #[error("Transformation failed: {0}")]
    Service(String),
    #[error("Malformed transformation response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl TransformError {
    /// HTTP-style status code for this error
    pub fn status(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::Invalid(_) => 400,
            Self::Unavailable(_) => 503,
            Self::Service(_) | Self::Malformed(_) => 502,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
        }
    }
}

impl TransformRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: TransformProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Trimmed text if the request is acceptable
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let words = text.split_whitespace().count();
        if words > MAX_WORDS {
            return Err(ValidationError::TooLong { words });
        }
        Ok(text)
    }
}

/// The external generative service
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(
        &self,
        text: &str,
        profile: Option<&TransformProfile>,
    ) -> Result<TransformedContent, TransformError>;
}

/// Transformer used when no generative service is configured
pub struct UnconfiguredTransformer;

#[async_trait]
impl Transformer for UnconfiguredTransformer {
    async fn transform(
        &self,
        _text: &str,
        _profile: Option<&TransformProfile>,
    ) -> Result<TransformedContent, TransformError> {
        Err(TransformError::Unavailable(
            "no transformation service configured".to_string(),
        ))
    }
}

/// Difficulty on a 1-10 scale from a Flesch score
fn difficulty_for(score: f64) -> f64 {
    if score < 30.0 {
        8.0
    } else if score < 60.0 {
        5.0
    } else {
        3.0
    }
}

/// Deterministic stand-in used whenever the service cannot produce content
pub fn fallback_content(text: &str) -> TransformedContent {
    let score = flesch_reading_ease(text);

    let mut summary: String = text.chars().take(SUMMARY_CHARS).collect();
    if text.chars().count() > SUMMARY_CHARS {
        summary.push_str("...");
    }

    TransformedContent {
        simplified_version: text.to_string(),
        dyslexia_version: text.to_string(),
        adhd_chunked_version: vec![AdhdChunk {
            section_title: "Content".to_string(),
            content: text.to_string(),
            key_point: "Main content".to_string(),
        }],
        key_terms: Vec::new(),
        summary,
        difficulty_level: difficulty_for(score),
        original_complexity: Some(score),
        transformed_complexity: Some(score),
        complexity_reduction: Some(0.0),
    }
}

/// Attach readability metrics comparing `original` with the simplified version
pub fn with_metrics(original: &str, mut content: TransformedContent) -> TransformedContent {
    let original_score = flesch_reading_ease(original);
    let transformed_score = flesch_reading_ease(&content.simplified_version);
    content.original_complexity = Some(original_score);
    content.transformed_complexity = Some(transformed_score);
    content.complexity_reduction = Some(complexity_reduction_percent(
        original_score,
        transformed_score,
    ));
    content
}

/// Fixed-window request counter per client
#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window_ms: u64,
    windows: HashMap<String, (u32, u64)>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_MAX, RATE_LIMIT_WINDOW_MS)
    }
}

impl RateLimiter {
    pub fn new(max: u32, window_ms: u64) -> Self {
        Self {
            max,
            window_ms,
            windows: HashMap::new(),
        }
    }

    /// Count a request from `client`; false when its window is exhausted
    pub fn check(&mut self, client: &str, now_ms: u64) -> bool {
        let in_window = self
            .windows
            .get(client)
            .is_some_and(|(_, reset_at)| now_ms <= *reset_at);
        if !in_window {
            self.windows
                .insert(client.to_string(), (1, now_ms + self.window_ms));
            return true;
        }

        if let Some((count, _)) = self.windows.get_mut(client) {
            if *count >= self.max {
                return false;
            }
            *count += 1;
        }
        true
    }
}

/// Session cache key for `text`
pub fn cache_key(text: &str) -> String {
    let hash = text
        .chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32));
    format!("{}{:x}", TRANSFORM_CACHE_PREFIX, hash.unsigned_abs())
}

pub fn cached(store: &SessionStore, text: &str) -> Option<TransformedContent> {
    store.get_as(&cache_key(text))
}

pub fn store_cached(store: &mut SessionStore, text: &str, content: &TransformedContent) {
    store.set_as(cache_key(text), content);
}

/// Validating, rate-limited front of a [`Transformer`] that never fails to produce content
/// for an accepted request
pub struct TransformService {
    transformer: Arc<dyn Transformer>,
    limiter: Mutex<RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl TransformService {
    pub fn new(transformer: Arc<dyn Transformer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transformer,
            limiter: Mutex::new(RateLimiter::default()),
            clock,
        }
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Mutex::new(limiter);
        self
    }

    /// Handle one request from `client`
    ///
    /// Rejected requests (rate limit, validation) return an error; service failures
    /// degrade to [`fallback_content`].
    pub async fn handle(
        &self,
        client: &str,
        request: &TransformRequest,
    ) -> Result<TransformedContent, TransformError> {
        if !self.limiter.lock().check(client, self.clock.now_ms()) {
            crate::warn!("Transform rate limit exceeded for {}", client);
            return Err(TransformError::RateLimited);
        }

        let text = request.validate()?;
        crate::debug!("Transforming {} words", text.split_whitespace().count());

        match self
            .transformer
            .transform(text, request.profile.as_ref())
            .await
        {
            Ok(content) => Ok(with_metrics(text, content)),
            Err(e) => {
                crate::warn!("Transformation failed, using fallback: {}", e);
                Ok(fallback_content(text))
            }
        }
    }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
