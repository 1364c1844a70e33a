//! Model Invoker
//!
//! One implementation per provider behind the [`ModelInvoker`] trait. Each
//! implementation performs exactly one HTTP call per `invoke` and maps
//! provider failures onto [`LlmError`] with its own classifier, so the
//! fallback policy stays provider-agnostic.

pub mod gemini;
pub mod openai;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::CompletionRequest;

pub use gemini::{GeminiConfig, GeminiInvoker};
pub use openai::{OpenAiConfig, OpenAiInvoker};

/// Raw model text, or a classified provider failure.
pub type ProviderResult = Result<String, LlmError>;

#[async_trait]
pub trait ModelInvoker: Send + Sync + Debug {
    /// Provider identifier used in logs, e.g. `openai`.
    fn provider_name(&self) -> &'static str;

    /// Send one request and return the model's text.
    async fn invoke(&self, request: &CompletionRequest) -> ProviderResult;
}

/// The providers a request handler may use.
#[derive(Debug, Clone)]
pub struct Invokers {
    pub primary: Arc<dyn ModelInvoker>,
    /// Only consulted by routes that implement fallback
    pub secondary: Option<Arc<dyn ModelInvoker>>,
}

impl Invokers {
    pub fn new(primary: Arc<dyn ModelInvoker>) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn ModelInvoker>) -> Self {
        self.secondary = Some(secondary);
        self
    }
}

/// Join a base URL and a path with exactly one slash between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Message heuristics shared by the provider classifiers.
pub(crate) fn looks_like_quota(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("insufficient_quota")
        || lower.contains("quota")
        || lower.contains("billing")
        || lower.contains("credit balance")
}

pub(crate) fn looks_like_rate_limit(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("rate limit")
        || lower.contains("rate_limit")
        || lower.contains("ratelimit")
        || lower.contains("too many requests")
        || lower.contains("resource_exhausted")
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn body_sample(body: &str) -> String {
    body.chars().take(200).collect()
}
