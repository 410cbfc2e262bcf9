use serde_json::Value;
use thiserror::Error;

use crate::agent::stateless_llm::LlmError;

/// Pipeline stages, in order. Failures are tagged with the stage they stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    BuildingPrompt,
    AwaitingUpstream,
    ParsingReply,
    ValidatingShape,
    Normalizing,
}

#[derive(Debug, Error)]
pub enum TranslateError {
    /// Caller input problem
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing credential or other operator-side setup problem
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream transport error: {message}")]
    UpstreamTransport { status: Option<u16>, message: String },

    #[error("upstream format error: non-JSON reply")]
    UpstreamFormat { raw: String },

    #[error("upstream shape error: malformed response")]
    UpstreamShape { raw: Value },
}

impl TranslateError {
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::Validation(_) => "ValidationError",
            TranslateError::Configuration(_) => "ConfigurationError",
            TranslateError::UpstreamTransport { .. } => "UpstreamTransportError",
            TranslateError::UpstreamFormat { .. } => "UpstreamFormatError",
            TranslateError::UpstreamShape { .. } => "UpstreamShapeError",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            TranslateError::Validation(_) => Stage::Validating,
            TranslateError::Configuration(_) | TranslateError::UpstreamTransport { .. } => {
                Stage::AwaitingUpstream
            }
            TranslateError::UpstreamFormat { .. } => Stage::ParsingReply,
            TranslateError::UpstreamShape { .. } => Stage::ValidatingShape,
        }
    }
}

impl From<LlmError> for TranslateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => {
                TranslateError::Configuration("OpenAI API key is not configured".to_string())
            }
            LlmError::Api { status, message } => TranslateError::UpstreamTransport {
                status: Some(status),
                message,
            },
            LlmError::Transport(message) | LlmError::Decode(message) => {
                TranslateError::UpstreamTransport {
                    status: None,
                    message,
                }
            }
        }
    }
}
