//! Loading quiz configuration (prompt templates + server knobs) from TOML.
//!
//! See `QuizConfig`, `Prompts` and `ServerCfg` for the expected schema. Every
//! section and key is optional; missing values fall back to the defaults below.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub server: ServerCfg,
}

/// Prompt templates used by the prompt builder and the chat-style provider.
/// `quiz_template` understands `{count}` and `{topic}`; `schema_system` understands `{schema_json}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub quiz_template: String,
  pub schema_system: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_template: DEFAULT_QUIZ_TEMPLATE.into(),
      schema_system: "You are a JSON-only quiz generator. Reply with a single JSON value that validates against this JSON schema (type names are upper-case):\n{schema_json}\nNever wrap the JSON in markdown fences.".into(),
    }
  }
}

pub const DEFAULT_QUIZ_TEMPLATE: &str = r#"
You are an intelligent educational quiz generator.
Your task is to create exactly {count} quiz questions in JSON format based on the user's provided topic.

Topic: "{topic}"

Rules:
1. Generate exactly {count} unique, factual, and educational questions.
2. Keep questions concise and contextually accurate to the topic.
3. "Options" array must contain exactly 3 related but incorrect answers (distractors).
4. "CorrectAnswer" field must hold the single correct answer, and it must not appear in "Options".
5. "Category" should be a lowercase string reflecting the main subject of the topic (e.g., "science", "islamic history").
6. "Difficulty" must be "medium".
7. Maintain respect and cultural sensitivity.
8. Ensure no duplicate questions or answers within the generated set.

Return a pure JSON array of exactly {count} question objects that strictly adheres to the provided schema. Do not include any markdown, explanations, or text outside the JSON array.
"#;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerCfg {
  /// Deadline the HTTP layer puts around one generation call.
  pub request_timeout_secs: u64,
  pub static_dir: String,
}

impl Default for ServerCfg {
  fn default() -> Self {
    Self { request_timeout_secs: 60, static_dir: "./static".into() }
  }
}

impl ServerCfg {
  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs.max(1))
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "quizgen_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizgen_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizgen_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = parse_quiz_config("").expect("parse");
    assert_eq!(cfg.prompts.quiz_template, DEFAULT_QUIZ_TEMPLATE);
    assert_eq!(cfg.server.request_timeout_secs, 60);
    assert_eq!(cfg.server.static_dir, "./static");
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let cfg = parse_quiz_config(
      "[prompts]\nquiz_template = \"Make {count} about {topic}\"\n\n[server]\nrequest_timeout_secs = 5\n",
    )
    .expect("parse");
    assert_eq!(cfg.prompts.quiz_template, "Make {count} about {topic}");
    assert!(cfg.prompts.schema_system.contains("{schema_json}"));
    assert_eq!(cfg.server.request_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.server.static_dir, "./static");
  }

  #[test]
  fn bad_toml_is_an_error() {
    assert!(parse_quiz_config("[server]\nrequest_timeout_secs = \"soon\"").is_err());
  }
}
