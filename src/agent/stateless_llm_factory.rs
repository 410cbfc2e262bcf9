use std::sync::Arc;
use tracing::info;
use anyhow::Result;

use crate::agent::stateless_llm::StatelessLLMInterface;
use crate::agent::stateless_llm::openai_compatible_llm::OpenAICompatibleLLM;
use crate::config::LlmConfig;

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create an LLM based on the configuration.
    ///
    /// # Arguments
    /// * `config` - LLM configuration; `llm_provider` selects the implementation
    pub fn create_llm(config: &LlmConfig) -> Result<Arc<dyn StatelessLLMInterface>> {
        info!("Initializing LLM: {}", config.llm_provider);

        match config.llm_provider.as_str() {
            "openai_compatible_llm" | "openai_llm" | "gemini_llm" | "zhipu_llm"
            | "deepseek_llm" | "groq_llm" | "mistral_llm" => {
                Ok(Arc::new(OpenAICompatibleLLM::new(
                    config.base_url.clone(),
                    config.api_key().map(|s| s.to_string()),
                    config.organization_id.clone(),
                    config.project_id.clone(),
                )))
            }
            _ => Err(anyhow::anyhow!("Unsupported LLM provider: {}", config.llm_provider)),
        }
    }
}
