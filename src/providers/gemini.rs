//! Google Gemini generateContent invoker, used as the secondary provider.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    ModelInvoker, ProviderResult, body_sample, join_url, looks_like_quota, looks_like_rate_limit,
};
use crate::error::LlmError;
use crate::types::{ChatMessage, CompletionRequest, ContentPart, MessageContent, MessageRole};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const PROVIDER: &str = "gemini";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiInvoker {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiInvoker {
    pub fn new(config: GeminiConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn model<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        // Per-request overrides name OpenAI models; Gemini keeps its own.
        match request.model.as_deref() {
            Some(model) if model.starts_with("gemini") => model,
            _ => &self.config.model,
        }
    }

    /// Build the generateContent request body.
    ///
    /// System messages become `systemInstruction`, assistant turns use the
    /// `model` role.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let system_text = request
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.text())
            .collect::<Vec<_>>()
            .join("\n");
        let contents: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(message_to_json)
            .collect();

        let mut generation_config = json!({ "maxOutputTokens": request.max_tokens });
        if let Some(temperature) = request.temperature {
            generation_config["temperature"] = json!(temperature);
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });
        if !system_text.is_empty() {
            body["systemInstruction"] = json!({ "parts": [{ "text": system_text }] });
        }
        body
    }
}

fn message_to_json(message: &ChatMessage) -> Value {
    let role = match message.role {
        MessageRole::Assistant => "model",
        _ => "user",
    };
    let parts: Vec<Value> = match &message.content {
        MessageContent::Text(text) => vec![json!({ "text": text })],
        MessageContent::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => json!({ "text": text }),
                ContentPart::Image { media_type, data } => json!({
                    "inline_data": { "mime_type": media_type, "data": data }
                }),
            })
            .collect(),
    };
    json!({ "role": role, "parts": parts })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl ModelInvoker for GeminiInvoker {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn invoke(&self, request: &CompletionRequest) -> ProviderResult {
        let model = self.model(request);
        let url = join_url(
            &self.config.base_url,
            &format!("models/{model}:generateContent"),
        );
        let body = self.build_request_body(request);
        tracing::debug!(
            provider = PROVIDER,
            model,
            prompt_kind = request.prompt_kind,
            prompt_chars = request.prompt_chars(),
            max_tokens = request.max_tokens,
            "sending generateContent request"
        );

        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(classify_gemini_http_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        Ok(content)
    }
}

/// Classify Gemini HTTP errors from the `{ "error": { code, message, status } }` envelope.
pub fn classify_gemini_http_error(status: u16, body_text: &str) -> LlmError {
    let json: Option<Value> = serde_json::from_str(body_text).ok();
    let error_obj = json.as_ref().and_then(|j| j.get("error"));

    let message = error_obj
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body_sample(body_text));
    let error_status = error_obj
        .and_then(|e| e.get("status"))
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if status == 429 || error_status == "RESOURCE_EXHAUSTED" || looks_like_rate_limit(&message) {
        if looks_like_quota(&message) {
            return LlmError::QuotaExceededError(message);
        }
        return LlmError::RateLimitError(message);
    }
    if status == 401
        || status == 403
        || error_status == "UNAUTHENTICATED"
        || error_status == "PERMISSION_DENIED"
    {
        return LlmError::AuthenticationError(message);
    }

    LlmError::ApiError {
        code: status,
        message: format!("{PROVIDER} API error: {message}"),
        details: json,
    }
}
