//! Error types for quiz generation and the text-generation providers.

use std::time::Duration;

use thiserror::Error;

pub const MALFORMED_MESSAGE: &str =
  "The AI failed to generate a valid JSON response. Please try adjusting your topic or try again.";
pub const TRANSPORT_MESSAGE: &str = "Failed to generate quiz questions. An unexpected error occurred.";

/// Failures surfaced to whoever asked for a quiz. None of them are retried here.
#[derive(Debug, Error)]
pub enum QuizError {
  #[error("Topic cannot be empty.")]
  EmptyTopic,

  #[error("Failed to generate quiz questions. An unexpected error occurred. ({0})")]
  Transport(String),

  #[error("The AI failed to generate a valid JSON response. Please try adjusting your topic or try again. ({0})")]
  MalformedResponse(String),

  #[error("Invalid request body: {0}")]
  BadRequest(String),

  #[error("Quiz generation is not configured on this server.")]
  Unavailable,

  #[error("Quiz generation did not finish within {0:?}.")]
  Timeout(Duration),
}

impl QuizError {
  /// Stable machine-readable tag for API consumers.
  pub fn kind(&self) -> &'static str {
    match self {
      QuizError::EmptyTopic => "empty_topic",
      QuizError::BadRequest(_) => "bad_request",
      QuizError::Transport(_) => "transport",
      QuizError::MalformedResponse(_) => "malformed_response",
      QuizError::Unavailable => "unavailable",
      QuizError::Timeout(_) => "timeout",
    }
  }

  /// Message fit for showing to the user (no provider internals).
  pub fn user_message(&self) -> String {
    match self {
      QuizError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
      QuizError::MalformedResponse(_) => MALFORMED_MESSAGE.to_string(),
      QuizError::BadRequest(_) => "Invalid request body.".to_string(),
      other => other.to_string(),
    }
  }

  pub fn detail(&self) -> Option<&str> {
    match self {
      QuizError::Transport(d) | QuizError::MalformedResponse(d) | QuizError::BadRequest(d) => Some(d.as_str()),
      _ => None,
    }
  }
}

/// Anything that can go wrong talking to a model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("{provider} HTTP {status}: {message}")]
  Http { provider: &'static str, status: u16, message: String },

  #[error("{0} returned no text")]
  EmptyResponse(&'static str),
}

impl From<ProviderError> for QuizError {
  /// Provider failures that smell like JSON trouble are reported as malformed
  /// output; everything else is a transport failure.
  fn from(e: ProviderError) -> Self {
    let msg = e.to_string();
    if msg.to_lowercase().contains("json") {
      QuizError::MalformedResponse(msg)
    } else {
      QuizError::Transport(msg)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn json_signature_maps_to_malformed() {
    let e = ProviderError::Http {
      provider: "gemini",
      status: 500,
      message: "Failed to produce valid JSON for schema".into(),
    };
    assert!(matches!(QuizError::from(e), QuizError::MalformedResponse(_)));
  }

  #[test]
  fn other_provider_failures_map_to_transport() {
    let e = ProviderError::Http { provider: "gemini", status: 401, message: "API key not valid".into() };
    let q = QuizError::from(e);
    assert_eq!(q.kind(), "transport");
    assert_eq!(q.detail(), Some("gemini HTTP 401: API key not valid"));
  }

  #[test]
  fn malformed_and_transport_messages_differ() {
    let m = QuizError::MalformedResponse("x".into());
    let t = QuizError::Transport("x".into());
    assert_ne!(m.user_message(), t.user_message());
    assert!(m.user_message().contains("try adjusting your topic"));
  }

  #[test]
  fn bad_request_keeps_rejection_text_in_detail() {
    let e = QuizError::BadRequest("missing field `topic`".into());
    assert_eq!(e.kind(), "bad_request");
    assert_eq!(e.user_message(), "Invalid request body.");
    assert_eq!(e.detail(), Some("missing field `topic`"));
  }
}
