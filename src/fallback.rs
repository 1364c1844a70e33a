//! Provider Fallback Policy
//!
//! Try the primary call; when it fails with a rate-limit or quota error, run
//! the secondary call once. Every other primary failure propagates untouched
//! and the secondary is never started.

use std::future::Future;

use crate::error::LlmError;

/// Run `primary`, falling back to `secondary` on rate-limit/quota failures.
///
/// `secondary` is `None` when no fallback provider is configured, in which
/// case the primary error is returned as is. A failing secondary yields
/// [`LlmError::FallbackExhausted`] carrying both causes.
pub async fn with_fallback<T, P, PFut, S, SFut>(
    primary: P,
    secondary: Option<S>,
) -> Result<T, LlmError>
where
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<T, LlmError>>,
    S: FnOnce() -> SFut,
    SFut: Future<Output = Result<T, LlmError>>,
{
    let primary_error = match primary().await {
        Ok(value) => return Ok(value),
        Err(error) => error,
    };

    let class = primary_error.failure_class();
    if !primary_error.is_fallback_eligible() {
        return Err(primary_error);
    }
    let Some(secondary) = secondary else {
        tracing::warn!(
            failure = class.as_str(),
            error = %primary_error,
            "primary provider failed and no fallback provider is configured"
        );
        return Err(primary_error);
    };

    tracing::warn!(
        failure = class.as_str(),
        error = %primary_error,
        "primary provider unavailable, retrying with fallback provider"
    );
    secondary()
        .await
        .map_err(|secondary_error| LlmError::FallbackExhausted {
            primary: Box::new(primary_error),
            secondary: Box::new(secondary_error),
        })
}
