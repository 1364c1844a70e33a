//! Medical bill route: optional image text extraction, then a plain-language
//! analysis of the bill.

use serde::Serialize;

use super::RoutePayload;
use crate::error::HandlerError;
use crate::prompts::{self, PromptSpec};
use crate::providers::Invokers;
use crate::types::{ChatMessage, CompletionRequest, ContentPart};

pub const VALIDATION_MESSAGE: &str =
    "Please provide bill details either by uploading an image or entering text.";
pub const FAILURE_MESSAGE: &str = "Failed to analyze the bill. Please try again.";

const EXTRACTION_MAX_TOKENS: u32 = 1000;
const ANALYSIS_MAX_TOKENS: u32 = 2000;
const ANALYSIS_TEMPERATURE: f32 = 0.5;

/// Uploaded bill image, already base64 encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct BillImage {
    pub media_type: String,
    pub data: String,
}

/// Multipart form contents of the route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedBillRequest {
    pub bill_text: String,
    pub image: Option<BillImage>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MedBillResponse {
    pub explanation: String,
}

impl RoutePayload for MedBillResponse {
    const ROUTE: &'static str = "medbillgpt";

    fn from_validation(message: String) -> Self {
        Self {
            explanation: message,
        }
    }

    fn from_failure(_error: &HandlerError) -> Self {
        Self {
            explanation: FAILURE_MESSAGE.to_string(),
        }
    }
}

pub async fn analyze_bill(
    invokers: &Invokers,
    vision_model: &str,
    request: MedBillRequest,
) -> Result<MedBillResponse, HandlerError> {
    let MedBillRequest { bill_text, image } = request;
    if bill_text.trim().is_empty() && image.is_none() {
        return Err(HandlerError::Validation(VALIDATION_MESSAGE.to_string()));
    }

    let bill_content = match image {
        Some(image) => {
            let extraction = PromptSpec::BillImageExtraction;
            let completion = CompletionRequest::with_messages(
                extraction.kind(),
                vec![ChatMessage::user_with_parts(vec![
                    ContentPart::text(prompts::build(&extraction)),
                    ContentPart::image_base64(image.media_type, image.data),
                ])],
                EXTRACTION_MAX_TOKENS,
            )
            .with_model(vision_model);
            let extracted = invokers.primary.invoke(&completion).await?;
            tracing::debug!(extracted_chars = extracted.len(), "bill image text extracted");
            format!("{extracted}\n\n{bill_text}")
        }
        None => bill_text,
    };

    if bill_content.trim().is_empty() {
        return Err(HandlerError::Validation(VALIDATION_MESSAGE.to_string()));
    }

    let analysis = PromptSpec::BillAnalysis {
        bill_content: bill_content.trim().to_string(),
    };
    let completion =
        CompletionRequest::prompt(analysis.kind(), prompts::build(&analysis), ANALYSIS_MAX_TOKENS)
            .with_temperature(ANALYSIS_TEMPERATURE);
    let explanation = invokers.primary.invoke(&completion).await?;

    Ok(MedBillResponse { explanation })
}
