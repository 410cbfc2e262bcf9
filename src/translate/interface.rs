/// Request and result types of the translation pipeline

use serde::{Deserialize, Serialize};

use super::error::TranslateError;

pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

/// A validated (sentence, target language) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    sentence: String,
    target_language: String,
}

impl TranslationRequest {
    /// Trims both inputs; a blank sentence is rejected and a blank target
    /// language falls back to English
    pub fn new(sentence: &str, target_language: Option<&str>) -> Result<Self, TranslateError> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(TranslateError::Validation("missing sentence".to_string()));
        }

        let target_language = target_language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_TARGET_LANGUAGE);

        Ok(Self {
            sentence: sentence.to_string(),
            target_language: target_language.to_string(),
        })
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGloss {
    pub word: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub full_translation: String,
    pub words: Vec<WordGloss>,
}
