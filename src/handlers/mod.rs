//! Request Handlers
//!
//! One async function per route: validate the typed request, build prompts,
//! invoke the provider(s), parse. Handlers know nothing about HTTP; the
//! [`crate::server`] module turns their results into responses through
//! [`RoutePayload`].

pub mod chat;
pub mod formula;
pub mod medbill;
pub mod username;

use serde::Serialize;
use validator::ValidationError;

use crate::error::HandlerError;

pub use chat::{ChatRequest, ChatResponse};
pub use formula::{FormulaRequest, FormulaResponse};
pub use medbill::{BillImage, MedBillRequest, MedBillResponse};
pub use username::{UsernameRequest, UsernameResponse};

/// Route response body, including the fixed shapes used when a request fails.
pub trait RoutePayload: Serialize + Sized {
    /// Route name used in logs.
    const ROUTE: &'static str;

    /// Benign payload for a blank required field.
    fn from_validation(message: String) -> Self;

    /// Fixed payload for any other failure.
    fn from_failure(error: &HandlerError) -> Self;
}

/// `validator` check rejecting empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
