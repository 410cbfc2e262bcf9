//! Parsing, shape validation and normalization of the model's reply.
//!
//! The reply is untrusted: it may not be JSON at all, may be JSON of the wrong
//! shape, or may carry gloss entries with missing or non-string fields.

use serde_json::{Map, Number, Value};

use super::error::TranslateError;
use super::interface::{TranslationResult, WordGloss};

/// Parse the reply content; an absent or empty reply counts as `{}`
pub fn parse_reply(content: Option<&str>) -> Result<Value, TranslateError> {
    let content = content.filter(|c| !c.is_empty()).unwrap_or("{}");
    serde_json::from_str(content).map_err(|_| TranslateError::UpstreamFormat {
        raw: content.to_string(),
    })
}

/// Check the parsed reply has a string `fullTranslation` and an array `words`
pub fn validate_shape(data: Value) -> Result<Map<String, Value>, TranslateError> {
    let well_formed = matches!(data.get("fullTranslation"), Some(Value::String(_)))
        && matches!(data.get("words"), Some(Value::Array(_)));
    match data {
        Value::Object(object) if well_formed => Ok(object),
        other => Err(TranslateError::UpstreamShape { raw: other }),
    }
}

/// Trim the full translation and clean the gloss list, keeping upstream order
pub fn normalize_reply(mut reply: Map<String, Value>) -> TranslationResult {
    let full_translation = match reply.remove("fullTranslation") {
        Some(Value::String(text)) => text.trim().to_string(),
        _ => String::new(),
    };
    let words = match reply.remove("words") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter(|entry| is_truthy(entry))
            .filter_map(Value::as_object)
            .map(coerce_entry)
            .filter(|gloss| !gloss.word.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    };

    TranslationResult {
        full_translation,
        words,
    }
}

fn coerce_entry(entry: &Map<String, Value>) -> WordGloss {
    WordGloss {
        word: coerce_text(entry.get("word")),
        translation: coerce_text(entry.get("translation")),
    }
}

/// Models sometimes emit numbers or nested values where text was asked for;
/// keep a textual form instead of discarding the entry. Whole floats drop their
/// fraction, arrays join their elements with commas, objects render as
/// `[object Object]`.
pub(crate) fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(other) => value_text(other),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        // Array elements that are null render as empty, joined by commas
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e21 => format!("{:.0}", n),
        _ => number.to_string(),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
