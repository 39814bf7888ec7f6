//! Text-generation collaborator.
//!
//! Flows talk to [`TextGenerator`]; production wires in [`ClaudeClient`], tests wire in stubs.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use crate::config::Config;
use crate::models::chat::{ChatMessage, ChatRole};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const BASE_BACKOFF_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty response")]
    EmptyResponse,
}

impl GenerationError {
    fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Transport(_) => true,
            GenerationError::Api { status, .. } => *status == 429 || *status >= 500,
            GenerationError::Malformed(_) | GenerationError::EmptyResponse => false,
        }
    }
}

/// One generation call: instructions, earlier turns, and the new prompt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub max_tokens: u32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

pub struct ClaudeClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl ClaudeClient {
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.generation_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.claude_api_url.clone(),
            api_key: config.claude_api_key.clone(),
            model: config.claude_model.clone(),
            max_retries: config.generation_max_retries,
        })
    }

    async fn send_once(&self, body: &Value) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let payload: Value = response.json().await?;
        extract_text(&payload)
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = build_messages_body(&self.model, &request);
        let mut attempt = 0;

        loop {
            match self.send_once(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Generation call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Exponential backoff with up to 25% jitter.
fn backoff_delay(attempt: u32) -> Duration {
    let base = BASE_BACKOFF_MS.saturating_mul(1 << attempt.min(6));
    let jitter = rand::thread_rng().gen_range(0..=base / 4);
    Duration::from_millis(base + jitter)
}

/// Anthropic Messages API body. `model` turns become `assistant`; the prompt is the final user turn.
pub fn build_messages_body(model: &str, request: &GenerationRequest) -> Value {
    let mut messages: Vec<Value> = request
        .history
        .iter()
        .filter(|m| !m.text.trim().is_empty())
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Model => "assistant",
            };
            json!({ "role": role, "content": m.text })
        })
        .collect();
    messages.push(json!({ "role": "user", "content": request.prompt }));

    json!({
        "model": model,
        "max_tokens": request.max_tokens,
        "system": request.system,
        "messages": messages,
    })
}

/// Concatenated `text` blocks of a Messages API response.
pub fn extract_text(payload: &Value) -> Result<String, GenerationError> {
    let blocks = payload["content"]
        .as_array()
        .ok_or_else(|| GenerationError::Malformed("missing content array".into()))?;

    let text: String = blocks
        .iter()
        .filter(|block| block["type"].as_str().unwrap_or("text") == "text")
        .filter_map(|block| block["text"].as_str())
        .collect::<Vec<_>>()
        .join("");

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_maps_roles_and_appends_prompt() {
        let request = GenerationRequest {
            system: "be kind".into(),
            history: vec![
                ChatMessage::user("hi"),
                ChatMessage::model("hello!"),
                ChatMessage::user("   "),
            ],
            prompt: "how much water?".into(),
            max_tokens: 256,
        };

        let body = build_messages_body("test-model", &request);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["system"], "be kind");
        assert_eq!(body["max_tokens"], 256);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "how much water?");
    }

    #[test]
    fn test_extract_text_joins_blocks() {
        let payload = json!({
            "content": [
                { "type": "text", "text": "Great job " },
                { "type": "text", "text": "today!\n" }
            ]
        });
        assert_eq!(extract_text(&payload).unwrap(), "Great job today!");
    }

    #[test]
    fn test_extract_text_errors() {
        assert!(matches!(
            extract_text(&json!({ "content": [] })),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text(&json!({ "error": "overloaded" })),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_retry_classification() {
        assert!(GenerationError::Api { status: 529, body: String::new() }.is_retryable());
        assert!(GenerationError::Api { status: 429, body: String::new() }.is_retryable());
        assert!(!GenerationError::Api { status: 400, body: String::new() }.is_retryable());
        assert!(!GenerationError::EmptyResponse.is_retryable());
    }

    #[test]
    fn test_backoff_grows() {
        let first = backoff_delay(0);
        let second = backoff_delay(1);
        assert!(first >= Duration::from_millis(BASE_BACKOFF_MS));
        assert!(first <= Duration::from_millis(BASE_BACKOFF_MS + BASE_BACKOFF_MS / 4));
        assert!(second >= Duration::from_millis(BASE_BACKOFF_MS * 2));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = ClaudeClient::from_config(&Config::for_tests()).unwrap();
        let result = client
            .generate(GenerationRequest {
                system: String::new(),
                history: vec![],
                prompt: "ping".into(),
                max_tokens: 16,
            })
            .await;
        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }
}
