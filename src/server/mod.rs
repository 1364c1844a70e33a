//! HTTP surface
//!
//! Axum router exposing the four generation routes plus `/health`. Route
//! functions only extract the request, run the handler inside a request span
//! and turn the [`HandlerError`] into the route's fixed payload:
//!
//! - success: `200` with the handler's payload
//! - blank input: `200` with the benign validation message
//! - anything else: `500` with the route's failure payload

mod multipart;

use std::future::Future;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AppError, HandlerError};
use crate::handlers::{
    self, ChatRequest, ChatResponse, FormulaRequest, FormulaResponse, MedBillResponse,
    RoutePayload, UsernameRequest, UsernameResponse,
};
use crate::providers::Invokers;

/// State shared by every route.
#[derive(Debug, Clone)]
pub struct AppState {
    pub invokers: Invokers,
    /// Model used to read uploaded bill images
    pub vision_model: String,
}

impl AppState {
    pub fn new(invokers: Invokers, vision_model: impl Into<String>) -> Self {
        Self {
            invokers,
            vision_model: vision_model.into(),
        }
    }
}

pub fn router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/formulagpt", post(formulagpt))
        .route("/api/medbillgpt", post(medbillgpt))
        .route("/api/username", post(username))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Serve `app` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    tracing::info!(addr = ?listener.local_addr().ok(), "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    run::<ChatResponse, _>(async move {
        let Json(request) = payload.map_err(invalid_json)?;
        handlers::chat::chat(&state.invokers, request).await
    })
    .await
}

async fn formulagpt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormulaRequest>, JsonRejection>,
) -> Response {
    run::<FormulaResponse, _>(async move {
        let Json(request) = payload.map_err(invalid_json)?;
        handlers::formula::formulas(&state.invokers, request).await
    })
    .await
}

async fn username(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UsernameRequest>, JsonRejection>,
) -> Response {
    run::<UsernameResponse, _>(async move {
        let Json(request) = payload.map_err(invalid_json)?;
        handlers::username::usernames(&state.invokers, request).await
    })
    .await
}

async fn medbillgpt(
    State(state): State<Arc<AppState>>,
    form: Result<Multipart, MultipartRejection>,
) -> Response {
    run::<MedBillResponse, _>(async move {
        let form = form.map_err(|e| HandlerError::InvalidBody(e.body_text()))?;
        let request = multipart::read_bill_form(form).await?;
        handlers::medbill::analyze_bill(&state.invokers, &state.vision_model, request).await
    })
    .await
}

fn invalid_json(rejection: JsonRejection) -> HandlerError {
    HandlerError::InvalidBody(rejection.body_text())
}

/// Run one request inside its span and render the outcome.
async fn run<T, F>(handler: F) -> Response
where
    T: RoutePayload,
    F: Future<Output = Result<T, HandlerError>>,
{
    let span = tracing::info_span!(
        "request",
        route = T::ROUTE,
        request_id = %Uuid::new_v4()
    );
    async move { respond(handler.await) }.instrument(span).await
}

fn respond<T: RoutePayload>(result: Result<T, HandlerError>) -> Response {
    match result {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(HandlerError::Validation(message)) => {
            tracing::info!("rejected blank input");
            (StatusCode::OK, Json(T::from_validation(message))).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(T::from_failure(&error)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;

    #[test]
    fn validation_is_benign() {
        let response = respond::<ChatResponse>(Err(HandlerError::Validation("empty".into())));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn provider_failure_is_server_error() {
        let response = respond::<UsernameResponse>(Err(HandlerError::Llm(
            LlmError::api_error(500, "boom"),
        )));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
