//! Test helpers: a scripted `ModelInvoker` and router request utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use simpgpt::server::{self, AppState};
use simpgpt::{CompletionRequest, Invokers, LlmError, ModelInvoker, ProviderResult};
use tower::ServiceExt;

/// Replays scripted results in order and counts calls.
#[derive(Debug)]
pub struct StubInvoker {
    name: &'static str,
    results: Mutex<VecDeque<ProviderResult>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicU32,
}

impl StubInvoker {
    pub fn new(name: &'static str, results: Vec<ProviderResult>) -> Arc<Self> {
        Arc::new(Self {
            name,
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelInvoker for StubInvoker {
    fn provider_name(&self) -> &'static str {
        self.name
    }

    async fn invoke(&self, request: &CompletionRequest) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InternalError("stub exhausted".into())))
    }
}

pub fn app(invokers: Invokers) -> Router {
    let state = Arc::new(AppState::new(invokers, "gpt-4o"));
    server::router(state, 1024 * 1024)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
