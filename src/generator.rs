//! The text-generation capability the quiz client depends on.
//!
//! Providers (Gemini, OpenAI-compatible) implement `TextGenerator`; the quiz
//! client only ever sees `Arc<dyn TextGenerator>`.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::prompt::SchemaDescriptor;

#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Short provider name for logs and the health endpoint.
  fn provider(&self) -> &'static str;

  /// Model identifier sent with every request.
  fn model(&self) -> &str;

  /// One round trip: prompt + output schema + temperature in, raw text out.
  async fn generate(
    &self,
    prompt: &str,
    schema: &SchemaDescriptor,
    temperature: f32,
  ) -> Result<String, ProviderError>;
}

#[cfg(test)]
pub(crate) mod fake {
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Mutex;
  use std::time::Duration;

  use super::*;

  /// Canned-reply generator that records what it was asked.
  pub struct FakeGenerator {
    reply: Result<String, String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
    pub last_temperature: Mutex<Option<f32>>,
  }

  impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
      Self::new(Ok(text.to_string()))
    }

    /// Fails like a provider returning a non-2xx status with `message`.
    pub fn failing(message: &str) -> Self {
      Self::new(Err(message.to_string()))
    }

    fn new(reply: Result<String, String>) -> Self {
      Self {
        reply,
        delay: None,
        calls: AtomicUsize::new(0),
        last_prompt: Mutex::new(None),
        last_temperature: Mutex::new(None),
      }
    }

    /// Holds every reply back by `delay`, like a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
      self.delay = Some(delay);
      self
    }

    pub fn call_count(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl TextGenerator for FakeGenerator {
    fn provider(&self) -> &'static str { "fake" }

    fn model(&self) -> &str { "fake-model" }

    async fn generate(
      &self,
      prompt: &str,
      _schema: &SchemaDescriptor,
      temperature: f32,
    ) -> Result<String, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
      *self.last_temperature.lock().unwrap() = Some(temperature);
      if let Some(delay) = self.delay {
        tokio::time::sleep(delay).await;
      }
      match &self.reply {
        Ok(text) => Ok(text.clone()),
        Err(message) => Err(ProviderError::Http { provider: "fake", status: 500, message: message.clone() }),
      }
    }
  }
}
