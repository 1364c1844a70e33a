//! Formula route: important formulas (with explanations) and the full list,
//! requested concurrently, with a whole-pair fallback to the secondary
//! provider on rate-limit or quota failures.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{RoutePayload, not_blank};
use crate::error::{HandlerError, LlmError};
use crate::fallback::with_fallback;
use crate::parser::{Subject, parse_formulas, parse_list};
use crate::prompts::{FormulaQuery, build_formula_prompts};
use crate::providers::{Invokers, ModelInvoker};
use crate::types::{CompletionRequest, FormulaRecord};

pub const VALIDATION_MESSAGE: &str = "Please provide a topic.";
pub const FAILURE_MESSAGE: &str = "Failed to generate formulas. Please try again.";

const IMPORTANT_MAX_TOKENS: u32 = 1000;
const ALL_MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.3;

/// Upper bounds of what the prompts ask for.
const MAX_IMPORTANT: usize = 15;
const MAX_ALL: usize = 25;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FormulaRequest {
    #[validate(custom(function = "not_blank"))]
    pub topic: String,
    pub subject: String,
    pub exam: String,
    pub subject_name: String,
    pub exam_name: String,
}

impl FormulaRequest {
    fn into_query(self) -> FormulaQuery {
        let subject_name = if self.subject_name.trim().is_empty() {
            self.subject.clone()
        } else {
            self.subject_name
        };
        let exam_name = if self.exam_name.trim().is_empty() {
            self.exam.clone()
        } else {
            self.exam_name
        };
        FormulaQuery {
            topic: self.topic,
            subject: self.subject,
            exam: self.exam,
            subject_name,
            exam_name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FormulaResponse {
    pub formulas: Vec<FormulaRecord>,
    #[serde(rename = "allFormulas")]
    pub all_formulas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw failure text, only set on server errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RoutePayload for FormulaResponse {
    const ROUTE: &'static str = "formulagpt";

    fn from_validation(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }

    fn from_failure(error: &HandlerError) -> Self {
        Self {
            error: Some(FAILURE_MESSAGE.to_string()),
            details: Some(error.to_string()),
            ..Default::default()
        }
    }
}

pub async fn formulas(
    invokers: &Invokers,
    request: FormulaRequest,
) -> Result<FormulaResponse, HandlerError> {
    request
        .validate()
        .map_err(|_| HandlerError::Validation(VALIDATION_MESSAGE.to_string()))?;

    let query = request.into_query();
    let subject = Subject::from_id(&query.subject);
    let prompts = build_formula_prompts(&query);
    let important_request =
        CompletionRequest::prompt("important-formulas", prompts.important, IMPORTANT_MAX_TOKENS)
            .with_temperature(TEMPERATURE);
    let all_request = CompletionRequest::prompt("all-formulas", prompts.all, ALL_MAX_TOKENS)
        .with_temperature(TEMPERATURE);
    let (important, all) = (&important_request, &all_request);

    let (important_raw, all_raw) = with_fallback(
        || run_pair(invokers.primary.as_ref(), important, all),
        invokers
            .secondary
            .as_deref()
            .map(|secondary| move || run_pair(secondary, important, all)),
    )
    .await?;

    let mut formulas = parse_formulas(&important_raw, subject);
    formulas.truncate(MAX_IMPORTANT);
    let all_formulas = parse_list(&all_raw, Some(MAX_ALL));
    tracing::info!(
        subject = %query.subject,
        formulas = formulas.len(),
        all_formulas = all_formulas.len(),
        "formulas generated"
    );

    Ok(FormulaResponse {
        formulas,
        all_formulas,
        error: None,
        details: None,
    })
}

/// Issue both prompts concurrently against one provider and wait for both.
///
/// A non-fallback failure in either call wins over a rate-limit/quota one so
/// the pair is only re-run on the secondary when nothing else went wrong.
async fn run_pair(
    invoker: &dyn ModelInvoker,
    important: &CompletionRequest,
    all: &CompletionRequest,
) -> Result<(String, String), LlmError> {
    let (important, all) = tokio::join!(invoker.invoke(important), invoker.invoke(all));
    match (important, all) {
        (Ok(important), Ok(all)) => Ok((important, all)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(first), Err(second)) => {
            if !first.is_fallback_eligible() || second.is_fallback_eligible() {
                Err(first)
            } else {
                Err(second)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::StubInvoker;
    use std::sync::Arc;

    const IMPORTANT_RAW: &str = "Here are the formulas:\n\
        1. v = u + at\nwhere v is final velocity, u is initial velocity\n\
        2. F = ma\nwhere F is force, m is mass";
    const ALL_RAW: &str = "1. v = u + at\n2. s = ut + 0.5at²\n3. v² = u² + 2as";

    fn request(topic: &str, subject: &str) -> FormulaRequest {
        FormulaRequest {
            topic: topic.into(),
            subject: subject.into(),
            exam: "jee".into(),
            subject_name: "Physics".into(),
            exam_name: "JEE Main".into(),
        }
    }

    #[tokio::test]
    async fn blank_topic_never_calls_the_model() {
        let stub = Arc::new(StubInvoker::default());
        let invokers = Invokers::new(stub.clone());
        let err = formulas(&invokers, request("   ", "physics")).await.unwrap_err();
        match err {
            HandlerError::Validation(msg) => assert_eq!(msg, VALIDATION_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn pairs_important_and_lists_all() {
        let stub = Arc::new(StubInvoker::replying(vec![
            Ok(IMPORTANT_RAW.to_string()),
            Ok(ALL_RAW.to_string()),
        ]));
        let invokers = Invokers::new(stub.clone());
        let response = formulas(&invokers, request("Kinematics", "physics")).await.unwrap();

        assert_eq!(
            response.formulas,
            vec![
                FormulaRecord::new("v = u + at", "v is final velocity, u is initial velocity"),
                FormulaRecord::new("F = ma", "F is force, m is mass"),
            ]
        );
        assert_eq!(response.all_formulas.len(), 3);
        assert_eq!(stub.calls(), 2);

        let requests = stub.requests();
        assert_eq!(requests[0].prompt_kind, "important-formulas");
        assert_eq!(requests[0].max_tokens, IMPORTANT_MAX_TOKENS);
        assert_eq!(requests[1].prompt_kind, "all-formulas");
        assert_eq!(requests[1].temperature, Some(TEMPERATURE));
    }

    #[tokio::test]
    async fn mathematics_drops_explanations() {
        let stub = Arc::new(StubInvoker::replying(vec![
            Ok(IMPORTANT_RAW.to_string()),
            Ok(ALL_RAW.to_string()),
        ]));
        let response = formulas(&Invokers::new(stub), request("Algebra", "mathematics"))
            .await
            .unwrap();
        assert_eq!(response.formulas.len(), 2);
        assert!(response.formulas.iter().all(|f| f.explanation.is_empty()));
    }

    #[tokio::test]
    async fn rate_limited_primary_reruns_both_on_secondary() {
        let primary = Arc::new(StubInvoker::replying(vec![
            Err(LlmError::api_error(429, "slow down")),
            Ok(ALL_RAW.to_string()),
        ]));
        let secondary = Arc::new(StubInvoker::replying(vec![
            Ok(IMPORTANT_RAW.to_string()),
            Ok("1. p = mv".to_string()),
        ]));
        let invokers = Invokers::new(primary.clone()).with_secondary(secondary.clone());

        let response = formulas(&invokers, request("Kinematics", "physics")).await.unwrap();
        assert_eq!(response.formulas.len(), 2);
        assert_eq!(response.all_formulas, vec!["p = mv"]);
        assert_eq!(primary.calls(), 2);
        assert_eq!(secondary.calls(), 2);
    }

    #[tokio::test]
    async fn non_quota_failure_skips_secondary() {
        let primary = Arc::new(StubInvoker::replying(vec![
            Ok(IMPORTANT_RAW.to_string()),
            Err(LlmError::api_error(500, "boom")),
        ]));
        let secondary = Arc::new(StubInvoker::default());
        let invokers = Invokers::new(primary).with_secondary(secondary.clone());

        let err = formulas(&invokers, request("Kinematics", "physics")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Llm(LlmError::ApiError { code: 500, .. })));
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn mixed_failures_prefer_the_fatal_one() {
        let primary = Arc::new(StubInvoker::replying(vec![
            Err(LlmError::api_error(429, "slow down")),
            Err(LlmError::AuthenticationError("bad key".into())),
        ]));
        let secondary = Arc::new(StubInvoker::default());
        let invokers = Invokers::new(primary).with_secondary(secondary.clone());

        let err = formulas(&invokers, request("Kinematics", "physics")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Llm(LlmError::AuthenticationError(_))));
        assert_eq!(secondary.calls(), 0);
    }

    #[test]
    fn failure_payload_is_empty_with_details() {
        let err = HandlerError::Llm(LlmError::api_error(500, "boom"));
        let payload = FormulaResponse::from_failure(&err);
        assert!(payload.formulas.is_empty());
        assert!(payload.all_formulas.is_empty());
        assert_eq!(payload.error.as_deref(), Some(FAILURE_MESSAGE));
        assert!(payload.details.unwrap().contains("boom"));
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let req: FormulaRequest = serde_json::from_str(
            r#"{"topic":"Optics","subject":"physics","exam":"neet","subjectName":"Physics","examName":"NEET"}"#,
        )
        .unwrap();
        assert_eq!(req.subject_name, "Physics");
        assert_eq!(req.exam_name, "NEET");

        let missing: FormulaRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());
    }
}
