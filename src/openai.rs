//! Minimal OpenAI-compatible client for quiz generation.
//!
//! We only call chat.completions. Chat endpoints have no portable way to take an
//! array-rooted response schema, so the schema travels inside the system message
//! and the reply is plain text for the quiz client to parse.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::ProviderError;
use crate::generator::TextGenerator;
use crate::prompt::SchemaDescriptor;
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  /// System template; `{schema_json}` is replaced with the serialized schema.
  pub schema_system: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(schema_system: &str) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model =
      std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = match reqwest::Client::builder().build() {
      Ok(client) => client,
      Err(e) => {
        error!(target: "quizgen_backend", error = %e, "Failed to build HTTP client");
        return None;
      }
    };

    Some(Self {
      client,
      api_key,
      base_url: base_url.trim_end_matches('/').to_string(),
      model,
      schema_system: schema_system.to_string(),
    })
  }

  fn build_request(&self, prompt: &str, schema: &SchemaDescriptor, temperature: f32) -> ChatCompletionRequest {
    let schema_json = serde_json::to_string(schema).unwrap_or_default();
    let system = fill_template(&self.schema_system, &[("schema_json", &schema_json)]);
    ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system },
        ChatMessageReq { role: "user".into(), content: prompt.into() },
      ],
      temperature,
    }
  }
}

#[async_trait]
impl TextGenerator for OpenAI {
  fn provider(&self) -> &'static str { "openai" }

  fn model(&self) -> &str { &self.model }

  #[instrument(level = "info", skip(self, prompt, schema), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate(
    &self,
    prompt: &str,
    schema: &SchemaDescriptor,
    temperature: f32,
  ) -> Result<String, ProviderError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = self.build_request(prompt, schema, temperature);

    let res = self.client.post(&url)
      .header(USER_AGENT, "quizgen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(ProviderError::Http { provider: "openai", status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .filter(|t| !t.trim().is_empty())
      .ok_or(ProviderError::EmptyResponse("openai"))?;
    info!(response_len = text.len(), "OpenAI response received");
    Ok(text)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

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

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
