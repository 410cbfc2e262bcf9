use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single chat message sent to the completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// Body of an OpenAI-style `chat/completions` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub response_format: ResponseFormat,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    /// The provider answered with a non-success status
    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a provider answer (DNS, TLS, connection reset...)
    #[error("LLM transport error: {0}")]
    Transport(String),

    #[error("LLM response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

/// Interface for a stateless language model
/// Stateless means the LLM doesn't store memory, system prompts, or user messages
#[async_trait]
pub trait StatelessLLMInterface: Send + Sync {
    /// Issue one chat completion and return the first choice's content, if any
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<Option<String>, LlmError>;

    /// Whether a credential is available; used for diagnostics only
    fn has_api_key(&self) -> bool;
}
