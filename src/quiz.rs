//! Generation client: prompt -> model -> validated `Vec<Question>`.
//!
//! Flow:
//! 1) Reject blank topics before anything touches the network.
//! 2) Build prompt + schema, make exactly one provider call at a fixed temperature.
//! 3) Parse the trimmed payload as JSON; it must be a non-empty array of objects.
//! 4) Map each object onto `Question` (field presence and kind only). Content
//!    problems are logged, never rejected.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

use crate::config::Prompts;
use crate::domain::{find_duplicate_texts, Difficulty, GenerationRequest, Question};
use crate::error::QuizError;
use crate::generator::TextGenerator;
use crate::prompt::build_request_with;
use crate::util::trunc_for_log;

/// Sampling temperature for every generation call.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct QuizClient {
  generator: Arc<dyn TextGenerator>,
  prompts: Prompts,
}

impl QuizClient {
  pub fn new(generator: Arc<dyn TextGenerator>, prompts: Prompts) -> Self {
    Self { generator, prompts }
  }

  pub fn provider(&self) -> &'static str {
    self.generator.provider()
  }

  pub fn model(&self) -> &str {
    self.generator.model()
  }

  #[instrument(level = "info", skip(self, topic), fields(topic_len = topic.len(), provider = self.generator.provider()))]
  pub async fn generate_quiz_questions(&self, topic: &str, count: i64) -> Result<Vec<Question>, QuizError> {
    let req = GenerationRequest::new(topic, count)?;
    let (prompt, schema) = build_request_with(&self.prompts, &req.topic, count);

    let start = Instant::now();
    let result = self.generator.generate(&prompt, &schema, TEMPERATURE).await;
    let elapsed = start.elapsed();

    let raw = match result {
      Ok(text) => {
        info!(target: "quiz", ?elapsed, response_len = text.len(), "Model response received");
        text
      }
      Err(e) => {
        let err = QuizError::from(e);
        error!(target: "quiz", ?elapsed, kind = err.kind(), error = %err, "Model call failed");
        return Err(err);
      }
    };

    let questions = parse_questions(&raw).map_err(|e| {
      error!(target: "quiz", error = %e, preview = %trunc_for_log(raw.trim(), 120), "Model output rejected");
      e
    })?;

    report_quality(&questions, req.question_count);
    info!(target: "quiz", returned = questions.len(), requested = req.question_count, "Quiz questions generated");
    Ok(questions)
  }
}

/// Parse a model payload into questions. All-or-nothing.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, QuizError> {
  let value: Value = serde_json::from_str(raw.trim())
    .map_err(|e| QuizError::MalformedResponse(format!("JSON parse error: {e}")))?;

  let items = match value {
    Value::Array(items) => items,
    other => {
      return Err(QuizError::MalformedResponse(format!(
        "expected a JSON array, got {}",
        json_kind(&other)
      )))
    }
  };
  if items.is_empty() {
    return Err(QuizError::MalformedResponse("JSON array is empty".into()));
  }

  items
    .iter()
    .enumerate()
    .map(|(i, item)| match item {
      Value::Object(obj) => map_question(obj).map_err(|why| QuizError::MalformedResponse(format!("item {i}: {why}"))),
      other => Err(QuizError::MalformedResponse(format!("item {i}: expected an object, got {}", json_kind(other)))),
    })
    .collect()
}

/// Bridge from the schema's JSON object to the domain type.
pub fn map_question(obj: &Map<String, Value>) -> Result<Question, String> {
  let difficulty_raw = str_field(obj, "Difficulty")?;
  let difficulty = Difficulty::parse(&difficulty_raw).unwrap_or_else(|| {
    warn!(target: "quiz", value = %difficulty_raw, "Unknown difficulty; treating as medium");
    Difficulty::Medium
  });

  Ok(Question {
    text: str_field(obj, "Text")?,
    options: str_list_field(obj, "Options")?,
    correct_answer: str_field(obj, "CorrectAnswer")?,
    category: str_field(obj, "Category")?,
    difficulty,
  })
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
  match obj.get(key) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(other) => Err(format!("field {key} should be a string, got {}", json_kind(other))),
    None => Err(format!("missing field {key}")),
  }
}

fn str_list_field(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, String> {
  match obj.get(key) {
    Some(Value::Array(items)) => items
      .iter()
      .map(|v| match v {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("field {key} should hold strings, got {}", json_kind(other))),
      })
      .collect(),
    Some(other) => Err(format!("field {key} should be an array, got {}", json_kind(other))),
    None => Err(format!("missing field {key}")),
  }
}

fn json_kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

fn report_quality(questions: &[Question], requested: usize) {
  if questions.len() != requested {
    warn!(target: "quiz", returned = questions.len(), requested, "Model returned a different number of questions");
  }
  for (i, q) in questions.iter().enumerate() {
    let issues = q.check_shape();
    if !issues.is_empty() {
      warn!(target: "quiz", index = i, ?issues, "Generated question has content issues");
    }
  }
  let dups = find_duplicate_texts(questions);
  if !dups.is_empty() {
    warn!(target: "quiz", duplicates = dups.len(), "Generated set repeats questions");
  }
}
