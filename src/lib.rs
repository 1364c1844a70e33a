//! # SimpGPT
//!
//! HTTP service that turns student, creator and patient requests into LLM
//! prompts and parses the replies into structured results.
//!
#![deny(unsafe_code)]

//! ## Routes
//!
//! - `POST /api/formulagpt`: important formulas with explanations plus the full list
//! - `POST /api/username`: numbered username suggestions for a platform
//! - `POST /api/medbillgpt`: plain-language medical bill explanation (text and/or image)
//! - `POST /api/chat`: short simple-language chat
//! - `GET /health`
//!
//! ## Providers
//!
//! OpenAI is the primary provider. When `GEMINI_API_KEY` is configured the
//! formula route falls back to Gemini on rate-limit or quota failures; every
//! other failure is returned as is.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use simpgpt::{AppConfig, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let invokers = config.build_invokers(reqwest::Client::new());
//!     let state = Arc::new(server::AppState::new(invokers, config.vision_model.clone()));
//!     let app = server::router(state, config.body_limit);
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//!     server::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, FailureClass, HandlerError, LlmError};
pub use fallback::with_fallback;
pub use providers::{Invokers, ModelInvoker, ProviderResult};
pub use types::{ChatMessage, CompletionRequest, FormulaRecord};
