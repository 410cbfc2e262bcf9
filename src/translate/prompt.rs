use serde_json::{json, Value};

use super::interface::TranslationRequest;

pub const TARGET_PLACEHOLDER: &str = "<TARGET>";

const SYSTEM_INSTRUCTIONS: &[&str] = &[
    "You are a precise Korean-to-<TARGET> translator and analyzer.",
    "Given a Korean sentence, first identify the meaningful words/tokens in order.",
    "Then provide a natural full-sentence translation into <TARGET>.",
    "Also provide a per-word gloss mapping each original word to a concise <TARGET> translation.",
    "Maintain original word order and do not invent extra words; if particles attach, decide the most instructive segmentation and be consistent.",
    "Return ONLY valid JSON with keys: fullTranslation (string), words (array of { word, translation }).",
    "No additional commentary. Values must be UTF-8 text. Keep explanations concise.",
];

/// System message with every placeholder replaced by the target language
pub fn build_system_prompt(target_language: &str) -> String {
    SYSTEM_INSTRUCTIONS
        .join(" ")
        .replace(TARGET_PLACEHOLDER, target_language)
}

/// JSON schema of the object the model is asked to return
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "fullTranslation": { "type": "string" },
            "words": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "word": { "type": "string" },
                        "translation": { "type": "string" }
                    },
                    "required": ["word", "translation"]
                }
            }
        },
        "required": ["fullTranslation", "words"]
    })
}

/// User message content: the request plus the expected output format, as JSON text
pub fn build_user_payload(request: &TranslationRequest) -> String {
    json!({
        "targetLanguage": request.target_language(),
        "sentence": request.sentence(),
        "format": output_schema(),
    })
    .to_string()
}
