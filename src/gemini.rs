//! Minimal Gemini client: `models/{model}:generateContent` with a response schema.
//!
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key. It travels in the `x-goog-api-key` header, not the URL.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::ProviderError;
use crate::generator::TextGenerator;
use crate::prompt::SchemaDescriptor;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl Gemini {
  pub fn new(client: reqwest::Client, api_key: String, base_url: String, model: String) -> Self {
    Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), model }
  }

  /// Construct the client if we find GEMINI_API_KEY (or API_KEY); otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY")
      .or_else(|_| std::env::var("API_KEY"))
      .ok()
      .filter(|k| !k.trim().is_empty())?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());

    // No client-level timeout: deadlines belong to the caller.
    let client = match reqwest::Client::builder().build() {
      Ok(client) => client,
      Err(e) => {
        error!(target: "quizgen_backend", error = %e, "Failed to build HTTP client");
        return None;
      }
    };

    Some(Self::new(client, api_key, base_url, model))
  }

  fn endpoint(&self) -> String {
    format!("{}/models/{}:generateContent", self.base_url, self.model)
  }
}

#[async_trait]
impl TextGenerator for Gemini {
  fn provider(&self) -> &'static str { "gemini" }

  fn model(&self) -> &str { &self.model }

  #[instrument(level = "info", skip(self, prompt, schema), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate(
    &self,
    prompt: &str,
    schema: &SchemaDescriptor,
    temperature: f32,
  ) -> Result<String, ProviderError> {
    let req = build_request_body(prompt, schema, temperature);

    let res = self.client.post(self.endpoint())
      .header(USER_AGENT, "quizgen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(API_KEY_HEADER, &self.api_key)
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_gemini_error(&body).unwrap_or(body);
      return Err(ProviderError::Http { provider: "gemini", status: status.as_u16(), message });
    }

    let body: GenerateContentResponse = res.json().await?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    let text = response_text(&body).ok_or(ProviderError::EmptyResponse("gemini"))?;
    info!(response_len = text.len(), "Gemini response received");
    Ok(text)
  }
}

fn build_request_body<'a>(prompt: &'a str, schema: &'a SchemaDescriptor, temperature: f32) -> GenerateContentRequest<'a> {
  GenerateContentRequest {
    contents: vec![Content { role: "user", parts: vec![PartReq { text: prompt }] }],
    generation_config: GenerationConfig {
      response_mime_type: "application/json",
      response_schema: schema,
      temperature,
    },
  }
}

/// Concatenated text parts of the first candidate, if there is any text at all.
fn response_text(body: &GenerateContentResponse) -> Option<String> {
  let parts = &body.candidates.first()?.content.as_ref()?.parts;
  let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
  if text.is_empty() { None } else { Some(text) }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents: Vec<Content<'a>>,
  generation_config: GenerationConfig<'a>,
}
#[derive(Serialize)]
struct Content<'a> { role: &'static str, parts: Vec<PartReq<'a>> }
#[derive(Serialize)]
struct PartReq<'a> { text: &'a str }
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
  response_mime_type: &'static str,
  response_schema: &'a SchemaDescriptor,
  temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate { #[serde(default)] content: Option<CandidateContent> }
#[derive(Deserialize)]
struct CandidateContent { #[serde(default)] parts: Vec<PartResp> }
#[derive(Deserialize)]
struct PartResp { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prompt::question_list_schema;

  #[test]
  fn request_body_matches_generate_content_shape() {
    let schema = question_list_schema();
    let body = serde_json::to_value(build_request_body("make a quiz", &schema, 0.7)).expect("serialize");
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "make a quiz");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    let t = body["generationConfig"]["temperature"].as_f64().expect("temperature");
    assert!((t - 0.7).abs() < 1e-6);
  }

  #[test]
  fn response_text_joins_parts_of_first_candidate() {
    let body: GenerateContentResponse = serde_json::from_str(r#"{
      "candidates": [{"content": {"role": "model", "parts": [{"text": "[{\"Text\":"}, {"text": "\"Q\"}]"}]}}],
      "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
    }"#).expect("parse");
    assert_eq!(response_text(&body).as_deref(), Some(r#"[{"Text":"Q"}]"#));
  }

  #[test]
  fn blocked_or_empty_candidates_yield_no_text() {
    let body: GenerateContentResponse = serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).expect("parse");
    assert!(response_text(&body).is_none());
    let body: GenerateContentResponse = serde_json::from_str("{}").expect("parse");
    assert!(response_text(&body).is_none());
  }

  #[test]
  fn error_body_message_is_extracted() {
    let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
    assert_eq!(extract_gemini_error(body).as_deref(), Some("API key not valid."));
    assert!(extract_gemini_error("<html>").is_none());
  }

  #[test]
  fn endpoint_includes_model_and_drops_trailing_slash() {
    let g = Gemini::new(reqwest::Client::new(), "k".into(), "http://localhost:9/v1beta/".into(), "gemini-2.5-flash".into());
    assert_eq!(g.endpoint(), "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(g.provider(), "gemini");
  }
}
