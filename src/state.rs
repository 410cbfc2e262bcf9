use std::sync::Arc;

use crate::agent::stateless_llm::StatelessLLMInterface;
use crate::agent::StatelessLLMFactory;
use crate::config::Config;
use crate::translate::TranslationRequestHandler;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: TranslationRequestHandler,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = StatelessLLMFactory::create_llm(&config.llm_config)?;
        Ok(Self::with_llm(config, llm))
    }

    /// Build the state around an already constructed upstream client
    pub fn with_llm(config: Config, llm: Arc<dyn StatelessLLMInterface>) -> Self {
        let translator = TranslationRequestHandler::new(llm, config.llm_config.model.clone());
        Self { config, translator }
    }
}
