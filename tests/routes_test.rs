//! Router-level tests with scripted providers.

#[path = "support/stub_invoker.rs"]
mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use simpgpt::{Invokers, LlmError};
use support::{StubInvoker, app, post_json, send};

const IMPORTANT: &str = "1. v = u + at\nwhere v is final velocity, u is initial velocity\n2. F = ma\nwhere F is force, m is mass";
const ALL: &str = "1. v = u + at\n2. F = ma\n3. p = mv";

const BOUNDARY: &str = "simpgpt-test-boundary";

fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/medbillgpt")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let primary = StubInvoker::new("primary", vec![]);
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Invokers::new(primary)), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn formula_blank_topic_is_benign_and_offline() {
    let primary = StubInvoker::new("primary", vec![]);
    let (status, body) = post_json(
        app(Invokers::new(primary.clone())),
        "/api/formulagpt",
        r#"{"topic":"  ","subject":"physics","exam":"jee"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "formulas": [], "allFormulas": [], "error": "Please provide a topic." })
    );
    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn formula_success_pairs_explanations() {
    let primary = StubInvoker::new("primary", vec![Ok(IMPORTANT.into()), Ok(ALL.into())]);
    let (status, body) = post_json(
        app(Invokers::new(primary.clone())),
        "/api/formulagpt",
        r#"{"topic":"Kinematics","subject":"physics","exam":"jee","subjectName":"Physics","examName":"JEE Main"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formulas"][0]["formula"], "v = u + at");
    assert_eq!(
        body["formulas"][1]["explanation"],
        "F is force, m is mass"
    );
    assert_eq!(body["allFormulas"], json!(["v = u + at", "F = ma", "p = mv"]));
    assert!(body.get("error").is_none());
    assert_eq!(primary.calls(), 2);
}

#[tokio::test]
async fn formula_rate_limit_falls_back_to_secondary() {
    let primary = StubInvoker::new(
        "primary",
        vec![
            Err(LlmError::RateLimitError("slow down".into())),
            Err(LlmError::RateLimitError("slow down".into())),
        ],
    );
    let secondary = StubInvoker::new("secondary", vec![Ok(IMPORTANT.into()), Ok(ALL.into())]);
    let invokers = Invokers::new(primary.clone()).with_secondary(secondary.clone());

    let (status, body) = post_json(
        app(invokers),
        "/api/formulagpt",
        r#"{"topic":"Kinematics","subject":"physics","exam":"jee"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formulas"].as_array().unwrap().len(), 2);
    assert_eq!(body["allFormulas"].as_array().unwrap().len(), 3);
    assert_eq!(primary.calls(), 2);
    assert_eq!(secondary.calls(), 2);
}

#[tokio::test]
async fn formula_server_error_skips_fallback() {
    let primary = StubInvoker::new(
        "primary",
        vec![
            Err(LlmError::api_error(500, "upstream exploded")),
            Ok(ALL.into()),
        ],
    );
    let secondary = StubInvoker::new("secondary", vec![]);
    let invokers = Invokers::new(primary).with_secondary(secondary.clone());

    let (status, body) = post_json(
        app(invokers),
        "/api/formulagpt",
        r#"{"topic":"Kinematics","subject":"physics","exam":"jee"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["formulas"], json!([]));
    assert_eq!(body["allFormulas"], json!([]));
    assert_eq!(body["error"], "Failed to generate formulas. Please try again.");
    assert!(
        body["details"]
            .as_str()
            .unwrap()
            .contains("upstream exploded")
    );
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn formula_fallback_exhausted_is_server_error() {
    let primary = StubInvoker::new(
        "primary",
        vec![
            Err(LlmError::QuotaExceededError("insufficient_quota".into())),
            Ok(ALL.into()),
        ],
    );
    let secondary = StubInvoker::new(
        "secondary",
        vec![Err(LlmError::api_error(503, "overloaded")), Ok(ALL.into())],
    );
    let invokers = Invokers::new(primary).with_secondary(secondary);

    let (status, body) = post_json(
        app(invokers),
        "/api/formulagpt",
        r#"{"topic":"Optics","subject":"physics","exam":"neet"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["formulas"], json!([]));
}

#[tokio::test]
async fn malformed_json_gets_fixed_failure_payload() {
    let primary = StubInvoker::new("primary", vec![]);
    let (status, body) = post_json(
        app(Invokers::new(primary.clone())),
        "/api/username",
        "{not json",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["names"], json!([]));
    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn username_is_truncated_to_count() {
    let raw = "Here you go:\n1. nova.dreams\n2. **nova_x**\n3. nova404\n4. novaverse\n5. itsnova\n6. nova.wav\n7. novacore\n8. nova_ok";
    let primary = StubInvoker::new("primary", vec![Ok(raw.into())]);
    let (status, body) = post_json(
        app(Invokers::new(primary.clone())),
        "/api/username",
        r#"{"keyword":"nova","platform":"tiktok","gender":"female","count":5}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["names"],
        json!(["nova.dreams", "nova_x", "nova404", "novaverse", "itsnova"])
    );
    let prompt = primary.requests()[0].messages[0].content.text();
    assert!(prompt.contains("Generate 5"));
    assert!(prompt.contains("tiktok"));
}

#[tokio::test]
async fn username_blank_keyword_is_benign() {
    let primary = StubInvoker::new("primary", vec![]);
    let (status, body) = post_json(
        app(Invokers::new(primary.clone())),
        "/api/username",
        r#"{"keyword":"","platform":"instagram"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["names"], json!([]));
    assert_eq!(body["error"], "Please provide a keyword.");
    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn chat_uses_eli5_prompt() {
    let primary = StubInvoker::new("primary", vec![Ok("1. Plants eat sunlight.".into())]);
    let (status, body) = post_json(
        app(Invokers::new(primary.clone())),
        "/api/chat",
        r#"{"mode":"eli5","messages":[{"role":"user","content":"what is photosynthesis"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": "1. Plants eat sunlight." }));
    let sent = &primary.requests()[0];
    assert_eq!(sent.max_tokens, 300);
    assert!(sent.messages[0].content.text().contains("5 year old"));
}

#[tokio::test]
async fn chat_provider_failure_is_fixed_reply() {
    let primary = StubInvoker::new(
        "primary",
        vec![Err(LlmError::AuthenticationError("missing key".into()))],
    );
    let (status, body) = post_json(
        app(Invokers::new(primary)),
        "/api/chat",
        r#"{"messages":[{"role":"user","content":"hi"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["reply"], "Something went wrong");
}

#[tokio::test]
async fn medbill_without_input_is_benign() {
    let primary = StubInvoker::new("primary", vec![]);
    let request = multipart_request(&[("billText", None, b"   ".as_slice())]);
    let (status, body) = send(app(Invokers::new(primary.clone())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["explanation"],
        "Please provide bill details either by uploading an image or entering text."
    );
    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn medbill_image_is_read_then_analyzed() {
    let primary = StubInvoker::new(
        "primary",
        vec![Ok("MRI $2400".into()), Ok("1. MRI explained".into())],
    );
    let request = multipart_request(&[
        ("billText", None, b"copay $50".as_slice()),
        ("file", Some(("bill.png", "image/png")), b"\x89PNG fake".as_slice()),
    ]);
    let (status, body) = send(app(Invokers::new(primary.clone())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"], "1. MRI explained");

    let requests = primary.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].model.as_deref(), Some("gpt-4o"));
    assert!(
        requests[1].messages[0]
            .content
            .text()
            .contains("MRI $2400\n\ncopay $50")
    );
}
