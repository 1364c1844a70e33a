//! Core error types.

use thiserror::Error;

/// Normalized classification of a provider failure.
///
/// Every provider adapter maps its own error envelope onto this closed set so
/// the fallback policy never has to look at provider-specific payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The provider throttled the request (HTTP 429 or equivalent).
    RateLimited,
    /// The account ran out of quota or credits.
    QuotaExhausted,
    /// Anything else.
    Other,
}

impl FailureClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::QuotaExhausted => "quota_exhausted",
            Self::Other => "other",
        }
    }
}

/// Errors produced while talking to a model provider.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success response that did not match a more specific variant
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceededError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// The provider answered 200 but the body was not what we expected
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Primary failed with a quota/rate-limit error and the secondary failed too
    #[error("Both providers failed (primary: {primary}; secondary: {secondary})")]
    FallbackExhausted {
        primary: Box<LlmError>,
        secondary: Box<LlmError>,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LlmError {
    /// Build an `ApiError` from a status code and message, promoting 429 to
    /// `RateLimitError`.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == 429 {
            return Self::RateLimitError(message);
        }
        Self::ApiError {
            code,
            message,
            details: None,
        }
    }

    /// HTTP status associated with the error, when known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::RateLimitError(_) => Some(429),
            Self::AuthenticationError(_) => Some(401),
            _ => None,
        }
    }

    /// Map the error onto the closed classification used by the fallback policy.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::RateLimitError(_) => FailureClass::RateLimited,
            Self::QuotaExceededError(_) => FailureClass::QuotaExhausted,
            Self::ApiError { code: 429, .. } => FailureClass::RateLimited,
            _ => FailureClass::Other,
        }
    }

    /// Whether a secondary provider should be tried after this error.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self.failure_class(), FailureClass::Other)
    }
}

/// Error returned by a request handler before it is turned into a route payload.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A required field was blank. Carries the benign, user-facing message.
    #[error("{0}")]
    Validation(String),

    /// The request body could not be read or decoded.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Startup errors surfaced by the binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Telemetry initialization error: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
