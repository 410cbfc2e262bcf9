use async_trait::async_trait;
use std::sync::Mutex;

use super::stateless_llm_interface::{ChatCompletionRequest, LlmError, StatelessLLMInterface};

/// Test double that answers every call with a fixed reply and records the requests
pub struct ScriptedLLM {
    reply: Result<Option<String>, LlmError>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl ScriptedLLM {
    pub fn replying(content: &str) -> Self {
        Self::with_reply(Ok(Some(content.to_string())))
    }

    pub fn with_reply(reply: Result<Option<String>, LlmError>) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatelessLLMInterface for ScriptedLLM {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<Option<String>, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone()
    }

    fn has_api_key(&self) -> bool {
        !matches!(self.reply, Err(LlmError::MissingApiKey))
    }
}

/// Test double that glosses the sentence it was sent, so concurrent callers can be told apart
pub struct EchoLLM;

#[async_trait]
impl StatelessLLMInterface for EchoLLM {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<Option<String>, LlmError> {
        let payload: serde_json::Value = request
            .messages
            .iter()
            .find(|m| m.role == "user")
            .and_then(|m| serde_json::from_str(&m.content).ok())
            .unwrap_or_default();
        let sentence = payload["sentence"].as_str().unwrap_or_default().to_string();
        let target = payload["targetLanguage"].as_str().unwrap_or_default().to_string();
        tokio::task::yield_now().await;
        Ok(Some(
            serde_json::json!({
                "fullTranslation": format!("{} ({})", sentence, target),
                "words": [{ "word": sentence, "translation": target }]
            })
            .to_string(),
        ))
    }

    fn has_api_key(&self) -> bool {
        true
    }
}
