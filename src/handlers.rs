use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::translate::normalize::{coerce_text, is_truthy};
use crate::translate::{TranslateError, TranslationRequestHandler, TranslationResult};

/// Fields of a `/api/translate` body, coerced to text.
/// Falsy values (`null`, `""`, `0`, `false`) count as absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TranslatePayload {
    pub sentence: String,
    pub target_lang: Option<String>,
}

impl TranslatePayload {
    /// Invalid JSON or a non-object body yields an empty payload
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                if !body.is_empty() {
                    warn!("Ignoring unparseable request body: {}", e);
                }
                return Self::default();
            }
        };

        let field = |name: &str| {
            value
                .get(name)
                .filter(|v| is_truthy(v))
                .map(|v| coerce_text(Some(v)))
        };

        Self {
            sentence: field("sentence").unwrap_or_default(),
            target_lang: field("targetLang"),
        }
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        let (status, body) = error_response(self);
        (status, Json(body)).into_response()
    }
}

/// Status and JSON body reported to the client for each failure kind.
/// Raw upstream content is only echoed for format and shape failures.
pub fn error_response(err: TranslateError) -> (StatusCode, Value) {
    match err {
        TranslateError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Missing required field: sentence" }),
        ),
        TranslateError::Configuration(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "API configuration error", "message": message }),
        ),
        TranslateError::UpstreamTransport { status, message } => {
            let status = status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                json!({ "error": "OpenAI API error", "message": message }),
            )
        }
        TranslateError::UpstreamFormat { raw } => (
            StatusCode::BAD_GATEWAY,
            json!({ "error": "Upstream returned non-JSON", "raw": raw }),
        ),
        TranslateError::UpstreamShape { raw } => (
            StatusCode::BAD_GATEWAY,
            json!({ "error": "Malformed response from model", "raw": raw }),
        ),
    }
}

/// Shared by every transport: coerce the body, then run the one translation pipeline
pub async fn handle_translate(
    handler: &TranslationRequestHandler,
    body: &[u8],
) -> Result<TranslationResult, TranslateError> {
    let payload = TranslatePayload::from_body(body);
    handler
        .translate(&payload.sentence, payload.target_lang.as_deref())
        .await
}
