//! Error Handling Module
//!
//! This module provides the error types shared by the service:
//! - Provider errors (`LlmError`) and their normalized `FailureClass`
//! - Request handler errors (`HandlerError`)
//! - Startup errors (`AppError`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use simpgpt::error::{FailureClass, LlmError};
//!
//! let error = LlmError::api_error(429, "Too many requests");
//! assert_eq!(error.failure_class(), FailureClass::RateLimited);
//! assert!(error.is_fallback_eligible());
//! ```

mod conversions;
pub mod types;

pub use types::*;
