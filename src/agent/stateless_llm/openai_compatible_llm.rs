use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::stateless_llm_interface::{ChatCompletionRequest, LlmError, StatelessLLMInterface};

/// OpenAI compatible LLM implementation
/// Talks to any server exposing `POST {base_url}/chat/completions`
pub struct OpenAICompatibleLLM {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    organization_id: Option<String>,
    project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl OpenAICompatibleLLM {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        organization_id: Option<String>,
        project_id: Option<String>,
    ) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        info!(
            "Initialized OpenAICompatibleLLM: base_url={}, api_key_present={}",
            base_url,
            api_key.is_some()
        );
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            organization_id,
            project_id,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<Option<String>, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let mut builder = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request);
        if let Some(org) = &self.organization_id {
            builder = builder.header("OpenAI-Organization", org);
        }
        if let Some(project) = &self.project_id {
            builder = builder.header("OpenAI-Project", project);
        }

        debug!("Sending chat completion: model={}", request.model);
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("upstream request failed")
                        .to_string()
                });
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response.json().await?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content))
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
