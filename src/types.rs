//! Shared data types: chat messages, completion requests and parsed records.

use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One part of a multimodal message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Inline image, base64 encoded
    Image {
        media_type: String,
        data: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image_base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Image {
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

/// Message content: plain text or a list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenated text of the content, ignoring images.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Parts(parts) => parts.iter().all(|p| match p {
                ContentPart::Text { text } => text.trim().is_empty(),
                ContentPart::Image { .. } => false,
            }),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user_with_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// A single request to a model provider.
///
/// Mirrors the `invoke(provider, prompt, maxTokens, temperature)` contract: the
/// provider is the invoker the request is handed to, the prompt is carried as
/// messages.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// Overrides the invoker's configured model (vision extraction uses this)
    pub model: Option<String>,
    /// Template identifier, used for logging only
    pub prompt_kind: &'static str,
}

impl CompletionRequest {
    /// Single user-message request.
    pub fn prompt(prompt_kind: &'static str, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            max_tokens,
            temperature: None,
            model: None,
            prompt_kind,
        }
    }

    pub fn with_messages(
        prompt_kind: &'static str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> Self {
        Self {
            messages,
            max_tokens,
            temperature: None,
            model: None,
            prompt_kind,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Total characters of text across all messages.
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.text().len()).sum()
    }
}

/// A formula with its optional explanation or memory trick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FormulaRecord {
    pub formula: String,
    /// Empty when the model omitted it or the subject is mathematics
    pub explanation: String,
}

impl FormulaRecord {
    pub fn new(formula: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            explanation: explanation.into(),
        }
    }

    pub fn bare(formula: impl Into<String>) -> Self {
        Self::new(formula, String::new())
    }
}
