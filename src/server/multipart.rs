//! Multipart form reading for the bill route.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::HandlerError;
use crate::handlers::{BillImage, MedBillRequest};

const TEXT_FIELD: &str = "billText";
const FILE_FIELD: &str = "file";
const FALLBACK_MEDIA_TYPE: &str = "image/png";

/// Collect `billText` and the optional `file` upload. Unknown fields are
/// skipped; an empty upload counts as no image.
pub(super) async fn read_bill_form(mut form: Multipart) -> Result<MedBillRequest, HandlerError> {
    let mut request = MedBillRequest::default();

    while let Some(field) = form.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(TEXT_FIELD) => {
                request.bill_text = field.text().await.map_err(invalid_form)?;
            }
            Some(FILE_FIELD) => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(invalid_form)?;
                if bytes.is_empty() {
                    continue;
                }
                tracing::debug!(bytes = bytes.len(), "bill image received");
                request.image = Some(BillImage {
                    media_type: media_type(content_type.as_deref(), file_name.as_deref()),
                    data: BASE64_STANDARD.encode(&bytes),
                });
            }
            _ => {}
        }
    }

    Ok(request)
}

/// Declared image type, else a guess from the file name.
fn media_type(content_type: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(declared) = content_type.filter(|ct| ct.starts_with("image/")) {
        return declared.to_string();
    }
    file_name
        .and_then(|name| mime_guess::from_path(name).first_raw())
        .filter(|guessed| guessed.starts_with("image/"))
        .unwrap_or(FALLBACK_MEDIA_TYPE)
        .to_string()
}

fn invalid_form(error: MultipartError) -> HandlerError {
    HandlerError::InvalidBody(error.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_image_type_wins() {
        assert_eq!(media_type(Some("image/png"), Some("bill.jpg")), "image/png");
    }

    #[test]
    fn generic_type_falls_back_to_file_name() {
        assert_eq!(
            media_type(Some("application/octet-stream"), Some("scan.webp")),
            "image/webp"
        );
        assert_eq!(media_type(None, Some("bill.PNG")), "image/png");
    }

    #[test]
    fn unknown_defaults_to_png() {
        assert_eq!(media_type(None, None), "image/png");
        assert_eq!(media_type(None, Some("bill.pdf")), "image/png");
        assert_eq!(media_type(Some("application/octet-stream"), None), "image/png");
    }
}
