//! Minimal OpenAI-compatible client for our use-cases.
//!
//! We only call chat.completions and request either plain text or a JSON
//! object. Any provider exposing the same route (OpenAI, Groq, an Azure
//! gateway) works by pointing OPENAI_BASE_URL at it.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::chat::ChatMessage;

#[derive(Debug, Error)]
pub enum LlmError {
  #[error("LLM request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("LLM HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("LLM returned an empty response")]
  Empty,
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  /// Conversation turns.
  pub fast_model: String,
  /// Description, solution and test case generation.
  pub strong_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())?;
    let base_url = std::env::var("OPENAI_BASE_URL")
      .unwrap_or_else(|_| "https://api.openai.com/v1".into())
      .trim_end_matches('/')
      .to_string();
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(60);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, strong_model })
  }

  /// One chat completion; returns the first choice's trimmed text.
  #[instrument(level = "info", skip(self, messages), fields(model = %model, messages = messages.len()))]
  async fn complete(
    &self,
    model: &str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: Option<u32>,
    json_mode: bool,
  ) -> Result<String, LlmError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages,
      temperature,
      response_format: json_mode.then(|| ResponseFormat { r#type: "json_object".into() }),
      max_tokens,
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "probforge-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      error!(status, elapsed = ?start.elapsed(), "LLM call failed");
      return Err(LlmError::Http { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "LLM usage");
    }
    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default().trim().to_string();
    info!(elapsed = ?start.elapsed(), response_len = text.len(), "LLM response received");

    if text.is_empty() {
      return Err(LlmError::Empty);
    }
    Ok(text)
  }

  // --- High-level helpers (domain-specialized) ---

  /// Next assistant turn of the requirements conversation.
  pub async fn chat_turn(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
    self.complete(&self.fast_model, messages, 0.7, None, false).await
  }

  /// Full labelled problem description.
  pub async fn generate_description(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
    self.complete(&self.strong_model, messages, 0.4, Some(4096), false).await
  }

  /// Reference solution source (may still carry a code fence).
  pub async fn generate_solution(&self, system: &str, user: &str) -> Result<String, LlmError> {
    let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];
    self.complete(&self.strong_model, messages, 0.2, Some(2000), false).await
  }

  /// Test cases as a raw `{"testcases": [...]}` JSON object.
  pub async fn generate_testcases(&self, system: &str, user: &str) -> Result<String, LlmError> {
    let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];
    self.complete(&self.strong_model, messages, 0.3, None, true).await
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessage>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI-style error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn request_serializes_roles_and_skips_empty_options() {
    let req = ChatCompletionRequest {
      model: "m".into(),
      messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
      temperature: 0.5,
      response_format: None,
      max_tokens: None,
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["messages"][0]["role"], "system");
    assert_eq!(v["messages"][1]["content"], "u");
    assert!(v.get("response_format").is_none());
    assert!(v.get("max_tokens").is_none());
  }

  #[test]
  fn json_mode_sets_response_format() {
    let req = ChatCompletionRequest {
      model: "m".into(),
      messages: vec![],
      temperature: 0.0,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
      max_tokens: Some(10),
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["response_format"]["type"], "json_object");
    assert_eq!(v["max_tokens"], 10);
  }

  #[test]
  fn response_without_content_decodes() {
    let body: ChatCompletionResponse =
      serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
    assert!(body.choices[0].message.content.is_none());
    assert!(body.usage.is_none());
  }

  #[test]
  fn extracts_provider_error_message() {
    assert_eq!(
      extract_openai_error(r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#),
      Some("Rate limit reached".to_string())
    );
    assert_eq!(extract_openai_error("<html>bad gateway</html>"), None);
  }
}
