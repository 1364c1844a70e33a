//! Service configuration
//!
//! Everything is read from environment variables. [`AppConfig::from_lookup`]
//! takes the lookup as a function so the parsing can be exercised without
//! touching the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client as HttpClient;
use secrecy::SecretString;

use crate::error::AppError;
use crate::providers::{
    GeminiConfig, GeminiInvoker, Invokers, OpenAiConfig, OpenAiInvoker, gemini, openai,
};
use crate::telemetry::{OutputFormat, SubscriberConfig, parse_level};

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
/// 10 MiB, enough for a phone photo of a bill.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub vision_model: String,
    /// Fallback provider, configured only when `GEMINI_API_KEY` is set
    pub gemini: Option<GeminiConfig>,
    pub bind_addr: SocketAddr,
    pub body_limit: usize,
    pub telemetry: SubscriberConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let openai = OpenAiConfig {
            api_key: var("OPENAI_API_KEY").map(SecretString::from),
            base_url: or("OPENAI_BASE_URL", openai::DEFAULT_BASE_URL),
            model: or("OPENAI_MODEL", openai::DEFAULT_MODEL),
        };
        let vision_model = or("OPENAI_VISION_MODEL", openai::DEFAULT_VISION_MODEL);

        let gemini = var("GEMINI_API_KEY").map(|key| GeminiConfig {
            api_key: SecretString::from(key),
            base_url: or("GEMINI_BASE_URL", gemini::DEFAULT_BASE_URL),
            model: or("GEMINI_MODEL", gemini::DEFAULT_MODEL),
        });

        let bind = or("SIMPGPT_BIND", DEFAULT_BIND);
        let bind_addr = bind
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid SIMPGPT_BIND '{bind}': {e}")))?;

        let body_limit = match var("SIMPGPT_BODY_LIMIT") {
            Some(limit) => limit.trim().parse().map_err(|e| {
                AppError::Config(format!("Invalid SIMPGPT_BODY_LIMIT '{limit}': {e}"))
            })?,
            None => DEFAULT_BODY_LIMIT,
        };

        let mut telemetry = SubscriberConfig::default();
        if let Some(level) = var("SIMPGPT_LOG_LEVEL") {
            telemetry.log_level = parse_level(&level)?;
        }
        if let Some(format) = var("SIMPGPT_LOG_FORMAT") {
            telemetry.output_format = format.parse::<OutputFormat>()?;
        }
        telemetry.log_file = var("SIMPGPT_LOG_FILE").map(PathBuf::from);

        Ok(Self {
            openai,
            vision_model,
            gemini,
            bind_addr,
            body_limit,
            telemetry,
        })
    }

    /// Build the provider invokers sharing one HTTP client.
    pub fn build_invokers(&self, http_client: HttpClient) -> Invokers {
        let primary = OpenAiInvoker::new(self.openai.clone(), http_client.clone());
        let invokers = Invokers::new(Arc::new(primary));
        match &self.gemini {
            Some(gemini) => invokers.with_secondary(Arc::new(GeminiInvoker::new(
                gemini.clone(),
                http_client,
            ))),
            None => invokers,
        }
    }
}
