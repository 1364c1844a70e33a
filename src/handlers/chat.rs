//! Chat route: the caller's conversation behind a fixed system prompt.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::RoutePayload;
use crate::error::HandlerError;
use crate::prompts::{self, ChatMode, PromptSpec};
use crate::providers::Invokers;
use crate::types::{ChatMessage, CompletionRequest};

pub const VALIDATION_MESSAGE: &str = "Please enter a question.";
pub const FAILURE_MESSAGE: &str = "Something went wrong";
pub const EMPTY_REPLY: &str = "No response";

const MAX_TOKENS: u32 = 300;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ChatRequest {
    #[validate(custom(function = "has_content"))]
    pub messages: Vec<ChatMessage>,
    pub mode: ChatMode,
}

fn has_content(messages: &Vec<ChatMessage>) -> Result<(), ValidationError> {
    if messages.iter().all(|m| m.content.is_blank()) {
        return Err(ValidationError::new("empty_conversation"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
}

impl RoutePayload for ChatResponse {
    const ROUTE: &'static str = "chat";

    fn from_validation(message: String) -> Self {
        Self { reply: message }
    }

    fn from_failure(_error: &HandlerError) -> Self {
        Self {
            reply: FAILURE_MESSAGE.to_string(),
        }
    }
}

pub async fn chat(invokers: &Invokers, request: ChatRequest) -> Result<ChatResponse, HandlerError> {
    request
        .validate()
        .map_err(|_| HandlerError::Validation(VALIDATION_MESSAGE.to_string()))?;

    let system = PromptSpec::ChatSystem(request.mode);
    let messages: Vec<ChatMessage> = std::iter::once(ChatMessage::system(prompts::build(&system)))
        .chain(request.messages)
        .collect();
    let completion = CompletionRequest::with_messages(system.kind(), messages, MAX_TOKENS);

    let reply = invokers.primary.invoke(&completion).await?;
    let reply = if reply.trim().is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        reply
    };
    Ok(ChatResponse { reply })
}
