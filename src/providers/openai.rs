//! OpenAI Chat Completions invoker.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    ModelInvoker, ProviderResult, body_sample, join_url, looks_like_quota, looks_like_rate_limit,
};
use crate::error::LlmError;
use crate::types::{ChatMessage, CompletionRequest, ContentPart, MessageContent};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

const PROVIDER: &str = "openai";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Missing keys are reported when a request is made, not at startup
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiInvoker {
    config: OpenAiConfig,
    http_client: HttpClient,
}

impl OpenAiInvoker {
    pub fn new(config: OpenAiConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Build the Chat Completions request body.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let messages: Vec<Value> = request.messages.iter().map(message_to_json).collect();

        let mut body = json!({
            "model": model,
            "messages": messages,
            "max_tokens": request.max_tokens,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

fn message_to_json(message: &ChatMessage) -> Value {
    let content = match &message.content {
        MessageContent::Text(text) => json!(text),
        MessageContent::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({ "type": "text", "text": text }),
                    ContentPart::Image { media_type, data } => json!({
                        "type": "image_url",
                        "image_url": { "url": format!("data:{media_type};base64,{data}") }
                    }),
                })
                .collect(),
        ),
    };
    json!({ "role": message.role.as_str(), "content": content })
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ModelInvoker for OpenAiInvoker {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn invoke(&self, request: &CompletionRequest) -> ProviderResult {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            LlmError::AuthenticationError("OPENAI_API_KEY is not configured".to_string())
        })?;

        let url = join_url(&self.config.base_url, "chat/completions");
        let body = self.build_request_body(request);
        tracing::debug!(
            provider = PROVIDER,
            model = %body["model"],
            prompt_kind = request.prompt_kind,
            prompt_chars = request.prompt_chars(),
            max_tokens = request.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(classify_openai_http_error(status.as_u16(), &text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        Ok(content)
    }
}

/// Classify OpenAI HTTP errors by parsing the standard error envelope.
///
/// OpenAI returns `{ "error": { "message": "...", "type": "...", "code": "..." } }`.
/// Quota exhaustion also arrives as 429, so the envelope is checked before the
/// status code.
pub fn classify_openai_http_error(status: u16, body_text: &str) -> LlmError {
    let json: Option<Value> = serde_json::from_str(body_text).ok();
    let error_obj = json.as_ref().and_then(|j| j.get("error"));

    let message = error_obj
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body_sample(body_text));
    let error_type = error_obj
        .and_then(|e| e.get("type"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let error_code = error_obj
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if error_type == "insufficient_quota" || error_code == "insufficient_quota" {
        return LlmError::QuotaExceededError(message);
    }
    if error_type == "rate_limit_error"
        || error_code == "rate_limit_exceeded"
        || status == 429
        || looks_like_rate_limit(&message)
    {
        if looks_like_quota(&message) {
            return LlmError::QuotaExceededError(message);
        }
        return LlmError::RateLimitError(message);
    }
    if status == 401 || error_type == "authentication_error" {
        return LlmError::AuthenticationError(message);
    }

    LlmError::ApiError {
        code: status,
        message: format!("{PROVIDER} API error: {message}"),
        details: json,
    }
}
