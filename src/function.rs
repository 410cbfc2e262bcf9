//! One-shot function invocation.
//!
//! Function hosts hand the process a single request event and expect a single
//! response object back. The event is read as JSON from stdin and the response
//! is written as JSON to stdout; translation goes through the same
//! [`handle_translate`] path as the HTTP server.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{info, warn};

use crate::handlers::{error_response, handle_translate};
use crate::translate::TranslationRequestHandler;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    fn new(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            "POST,OPTIONS".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        );
        if !body.is_empty() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        Self {
            status_code,
            headers,
            body,
        }
    }
}

pub async fn handle_event(
    handler: &TranslationRequestHandler,
    event: FunctionEvent,
) -> FunctionResponse {
    match event.http_method.to_ascii_uppercase().as_str() {
        "OPTIONS" => FunctionResponse::new(200, String::new()),
        "POST" => {
            let body = event.body.unwrap_or_default();
            let (status, value) = match handle_translate(handler, body.as_bytes()).await {
                Ok(result) => match serde_json::to_value(result) {
                    Ok(value) => (200, value),
                    Err(e) => (500, json!({ "error": "Internal server error", "message": e.to_string() })),
                },
                Err(err) => {
                    let (status, value) = error_response(err);
                    (status.as_u16(), value)
                }
            };
            FunctionResponse::new(status, value.to_string())
        }
        _ => FunctionResponse::new(405, json!({ "error": "Method not allowed" }).to_string()),
    }
}

/// Answer one raw event. An event that does not parse still gets a 400 response.
pub async fn answer(handler: &TranslationRequestHandler, input: &str) -> FunctionResponse {
    match serde_json::from_str::<FunctionEvent>(input) {
        Ok(event) => {
            info!("Handling function event: method={}", event.http_method);
            handle_event(handler, event).await
        }
        Err(e) => {
            warn!("Rejecting malformed function event: {}", e);
            FunctionResponse::new(
                400,
                json!({ "error": "Invalid function event", "message": e.to_string() }).to_string(),
            )
        }
    }
}

/// Read one event from stdin, answer it on stdout
pub async fn run_once(handler: &TranslationRequestHandler) -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;

    let response = answer(handler, &input).await;
    let mut output = serde_json::to_vec(&response)?;
    output.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;
    Ok(())
}
