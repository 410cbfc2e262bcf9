use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::error::{Stage, TranslateError};
use super::interface::{TranslationRequest, TranslationResult};
use super::normalize::{normalize_reply, parse_reply, validate_shape};
use super::prompt::{build_system_prompt, build_user_payload};
use crate::agent::stateless_llm::{
    ChatCompletionRequest, Message, ResponseFormat, StatelessLLMInterface,
};

pub const SAMPLING_TEMPERATURE: f64 = 0.3;

/// Turns one (sentence, target language) pair into one glossed translation.
///
/// Holds no per-request state: the upstream client is shared and the model
/// name is fixed at construction, so concurrent calls need no locking.
#[derive(Clone)]
pub struct TranslationRequestHandler {
    llm: Arc<dyn StatelessLLMInterface>,
    model: String,
}

impl TranslationRequestHandler {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>, model: String) -> Self {
        info!("TranslationRequestHandler initialized: model={}", model);
        Self { llm, model }
    }

    /// Validate, prompt the model once, and normalize its reply.
    /// Failures are logged before being returned.
    pub async fn translate(
        &self,
        sentence: &str,
        target_language: Option<&str>,
    ) -> Result<TranslationResult, TranslateError> {
        let request_id = Uuid::new_v4();
        let result = self.run(request_id, sentence, target_language).await;

        if let Err(err) = &result {
            error!(
                request_id = %request_id,
                kind = err.kind(),
                stage = ?err.stage(),
                api_key_present = self.llm.has_api_key(),
                error = %err,
                "Translation failed"
            );
        }
        result
    }

    async fn run(
        &self,
        request_id: Uuid,
        sentence: &str,
        target_language: Option<&str>,
    ) -> Result<TranslationResult, TranslateError> {
        debug!(request_id = %request_id, stage = ?Stage::Validating, "stage");
        let request = TranslationRequest::new(sentence, target_language)?;

        debug!(
            request_id = %request_id,
            stage = ?Stage::BuildingPrompt,
            target_language = request.target_language(),
            "stage"
        );
        let completion = self.build_completion(&request);

        debug!(request_id = %request_id, stage = ?Stage::AwaitingUpstream, "stage");
        let content = self.llm.chat_completion(completion).await?;

        debug!(request_id = %request_id, stage = ?Stage::ParsingReply, "stage");
        let data = parse_reply(content.as_deref())?;

        debug!(request_id = %request_id, stage = ?Stage::ValidatingShape, "stage");
        let reply = validate_shape(data)?;

        debug!(request_id = %request_id, stage = ?Stage::Normalizing, "stage");
        let result = normalize_reply(reply);

        info!(
            request_id = %request_id,
            words = result.words.len(),
            "Translation complete"
        );
        Ok(result)
    }

    fn build_completion(&self, request: &TranslationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            temperature: SAMPLING_TEMPERATURE,
            response_format: ResponseFormat::json_object(),
            messages: vec![
                Message::system(build_system_prompt(request.target_language())),
                Message::user(build_user_payload(request)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::stateless_llm::scripted_llm::{EchoLLM, ScriptedLLM};
    use crate::agent::stateless_llm::LlmError;
    use crate::translate::prompt::TARGET_PLACEHOLDER;
    use crate::translate::WordGloss;

    const GOOD_REPLY: &str =
        r#"{"fullTranslation": " Hello ", "words": [{"word":"안녕","translation":"hello"}]}"#;

    fn handler_with(llm: Arc<ScriptedLLM>) -> TranslationRequestHandler {
        TranslationRequestHandler::new(llm, "gpt-4o-mini-2024-07-18".to_string())
    }

    #[tokio::test]
    async fn issues_exactly_one_well_formed_call() {
        let llm = Arc::new(ScriptedLLM::replying(GOOD_REPLY));
        let handler = handler_with(llm.clone());

        let result = handler.translate("안녕", Some("Korean Sign Gloss")).await.unwrap();
        assert_eq!(result.full_translation, "Hello");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.response_format, ResponseFormat::json_object());
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(!request.messages[0].content.contains(TARGET_PLACEHOLDER));
        assert_eq!(request.messages[0].content.matches("Korean Sign Gloss").count(), 3);

        let payload: serde_json::Value = serde_json::from_str(&request.messages[1].content).unwrap();
        assert_eq!(payload["sentence"], "안녕");
        assert_eq!(payload["targetLanguage"], "Korean Sign Gloss");
    }

    #[tokio::test]
    async fn empty_sentence_never_reaches_upstream() {
        let llm = Arc::new(ScriptedLLM::replying(GOOD_REPLY));
        let handler = handler_with(llm.clone());

        let err = handler.translate("   ", Some("French")).await.unwrap_err();
        assert!(matches!(err, TranslateError::Validation(_)));
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn blank_target_behaves_like_english() {
        let blank = Arc::new(ScriptedLLM::replying(GOOD_REPLY));
        let english = Arc::new(ScriptedLLM::replying(GOOD_REPLY));

        let a = handler_with(blank.clone()).translate("안녕", Some("")).await.unwrap();
        let b = handler_with(english.clone()).translate("안녕", Some("English")).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(blank.requests(), english.requests());
    }

    #[tokio::test]
    async fn non_json_reply_is_a_format_error() {
        let llm = Arc::new(ScriptedLLM::replying("not json"));
        let err = handler_with(llm).translate("안녕", None).await.unwrap_err();
        assert!(matches!(err, TranslateError::UpstreamFormat { ref raw } if raw == "not json"));
    }

    #[tokio::test]
    async fn wrongly_typed_reply_is_a_shape_error() {
        let llm = Arc::new(ScriptedLLM::replying(r#"{"fullTranslation": 123, "words": []}"#));
        let err = handler_with(llm).translate("안녕", None).await.unwrap_err();
        assert!(matches!(err, TranslateError::UpstreamShape { .. }));
    }

    #[tokio::test]
    async fn empty_reply_is_a_shape_error() {
        let llm = Arc::new(ScriptedLLM::with_reply(Ok(None)));
        let err = handler_with(llm).translate("안녕", None).await.unwrap_err();
        assert!(matches!(err, TranslateError::UpstreamShape { .. }));
    }

    #[tokio::test]
    async fn reply_is_normalized() {
        let llm = Arc::new(ScriptedLLM::replying(
            r#"{"fullTranslation": " 안녕 ", "words": [{"word":"안녕","translation":"hello"},{"word":"","translation":"x"},null]}"#,
        ));
        let result = handler_with(llm).translate("안녕", None).await.unwrap();
        assert_eq!(result.full_translation, "안녕");
        assert_eq!(
            result.words,
            vec![WordGloss {
                word: "안녕".to_string(),
                translation: "hello".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn upstream_failures_surface_without_retry() {
        let llm = Arc::new(ScriptedLLM::with_reply(Err(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })));
        let err = handler_with(llm.clone()).translate("안녕", None).await.unwrap_err();
        assert!(matches!(err, TranslateError::UpstreamTransport { status: Some(503), .. }));
        assert_eq!(llm.requests().len(), 1);
    }

    #[tokio::test]
    async fn missing_credential_is_a_configuration_error() {
        let llm = Arc::new(ScriptedLLM::with_reply(Err(LlmError::MissingApiKey)));
        let err = handler_with(llm).translate("안녕", None).await.unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[tokio::test]
    async fn concurrent_calls_do_not_interfere() {
        let handler = TranslationRequestHandler::new(Arc::new(EchoLLM), "m".to_string());
        let inputs: Vec<(String, String)> = (0..32)
            .map(|i| (format!("문장 {i}"), format!("Lang{i}")))
            .collect();

        let results = futures::future::join_all(
            inputs
                .iter()
                .map(|(sentence, lang)| handler.translate(sentence, Some(lang.as_str()))),
        )
        .await;

        for ((sentence, lang), result) in inputs.iter().zip(results) {
            let result = result.unwrap();
            assert_eq!(result.full_translation, format!("{sentence} ({lang})"));
            assert_eq!(result.words[0].word, *sentence);
            assert_eq!(result.words[0].translation, *lang);
        }
    }
}
