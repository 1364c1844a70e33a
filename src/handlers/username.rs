//! Username route: a numbered list of handles for a keyword and platform.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{RoutePayload, not_blank};
use crate::error::HandlerError;
use crate::parser::parse_list;
use crate::prompts::{self, Gender, PromptSpec, UsernameQuery};
use crate::providers::Invokers;
use crate::types::CompletionRequest;

pub const VALIDATION_MESSAGE: &str = "Please provide a keyword.";
pub const FAILURE_MESSAGE: &str = "Failed to generate usernames. Please try again.";

pub const DEFAULT_COUNT: usize = 10;
pub const MAX_COUNT: usize = 30;

const TOKENS_PER_NAME: u32 = 25;
const MIN_TOKENS: u32 = 250;
const TEMPERATURE: f32 = 0.9;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UsernameRequest {
    #[validate(custom(function = "not_blank"))]
    pub keyword: String,
    pub platform: String,
    pub platform_rules: String,
    pub gender: Gender,
    pub count: Option<usize>,
}

impl UsernameRequest {
    /// Requested count, defaulted and clamped to `1..=MAX_COUNT`.
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT).clamp(1, MAX_COUNT)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UsernameResponse {
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RoutePayload for UsernameResponse {
    const ROUTE: &'static str = "username";

    fn from_validation(message: String) -> Self {
        Self {
            names: Vec::new(),
            error: Some(message),
        }
    }

    fn from_failure(_error: &HandlerError) -> Self {
        Self {
            names: Vec::new(),
            error: Some(FAILURE_MESSAGE.to_string()),
        }
    }
}

pub async fn usernames(
    invokers: &Invokers,
    request: UsernameRequest,
) -> Result<UsernameResponse, HandlerError> {
    request
        .validate()
        .map_err(|_| HandlerError::Validation(VALIDATION_MESSAGE.to_string()))?;

    let count = request.count();
    let query = UsernameQuery {
        keyword: request.keyword.trim().to_string(),
        platform: request.platform,
        platform_rules: request.platform_rules,
        gender: request.gender,
        count,
    };
    let spec = PromptSpec::Usernames(query);
    let max_tokens = MIN_TOKENS.max(TOKENS_PER_NAME * count as u32);
    let completion = CompletionRequest::prompt(spec.kind(), prompts::build(&spec), max_tokens)
        .with_temperature(TEMPERATURE);

    let raw = invokers.primary.invoke(&completion).await?;
    let names = parse_list(&raw, Some(count));
    tracing::info!(requested = count, generated = names.len(), "usernames generated");

    Ok(UsernameResponse { names, error: None })
}
