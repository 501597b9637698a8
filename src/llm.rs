//! LLM integration for workout generation
//!
//! This module handles the single chat-completion call made per request and
//! the cleanup of the model's raw text into a JSON value.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const COMPLETIONS_PATH: &str = "chat/completions";
pub const TEMPERATURE: f64 = 0.7;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LlmError {
  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Chat Completion API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  temperature: f64,
  messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
  #[serde(default)]
  usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
  content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
  pub prompt_tokens: u32,
  pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Chat Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ChatClient {
  client: Client,
  endpoint: Url,
  api_key: String,
  model: String,
}

impl ChatClient {
  /// `api_base` must end with a slash so the completions path is appended to it
  pub fn new(api_base: &Url, api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
    let endpoint = api_base
      .join(COMPLETIONS_PATH)
      .map_err(|e| LlmError::Request(format!("invalid API base {}: {}", api_base, e)))?;

    Ok(Self {
      client: Client::new(),
      endpoint,
      api_key: api_key.into(),
      model: model.into(),
    })
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  /// Send one system + user exchange and return the reply text
  pub async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
    let request = ChatRequest {
      model: &self.model,
      temperature: TEMPERATURE,
      messages: [
        ChatMessage {
          role: "system",
          content: system_prompt,
        },
        ChatMessage {
          role: "user",
          content: user_message,
        },
      ],
    };

    let response = self
      .client
      .post(self.endpoint.clone())
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      // Try to parse error response
      if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let chat_response: ChatResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    if let Some(usage) = chat_response.usage {
      tracing::debug!(
        model = %self.model,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        "completion finished"
      );
    }

    chat_response
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))
  }
}

/// ---------------------------------------------------------------------------
/// Response Normalization
/// ---------------------------------------------------------------------------

/// Remove an opening ```json or ``` fence, a closing ``` fence and surrounding
/// whitespace. Backticks inside the body are left alone.
pub fn strip_code_fences(text: &str) -> String {
  let trimmed = text.trim();
  let body = trimmed
    .strip_prefix("```json")
    .or_else(|| trimmed.strip_prefix("```"))
    .unwrap_or(trimmed);
  let body = body.strip_suffix("```").unwrap_or(body);
  body.trim().to_string()
}

/// Turn the model's raw reply into a JSON value. No repair is attempted.
pub fn parse_model_output(text: &str) -> Result<serde_json::Value, LlmError> {
  let cleaned = strip_code_fences(text);
  serde_json::from_str(&cleaned)
    .map_err(|e| LlmError::Parse(format!("model reply is not valid JSON: {}", e)))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
