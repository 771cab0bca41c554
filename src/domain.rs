//! Domain models: the generated question, its difficulty, and the per-submission request.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

pub const MIN_QUESTIONS: i64 = 5;
pub const MAX_QUESTIONS: i64 = 20;
pub const DISTRACTOR_COUNT: usize = 3;

/// Difficulty label. Generation always asks for `Medium`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  /// Case-insensitive parse; `None` for anything outside {easy, medium, hard}.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Some(Difficulty::Easy),
      "medium" => Some(Difficulty::Medium),
      "hard" => Some(Difficulty::Hard),
      _ => None,
    }
  }
}

/// One generated quiz item. Field names on the wire keep the
/// capitalized convention used by the copy/export features.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
  #[serde(rename = "Text")]
  pub text: String,
  /// Incorrect distractors; the correct answer is never in here.
  #[serde(rename = "Options")]
  pub options: Vec<String>,
  #[serde(rename = "CorrectAnswer")]
  pub correct_answer: String,
  #[serde(rename = "Category")]
  pub category: String,
  #[serde(rename = "Difficulty")]
  pub difficulty: Difficulty,
}

/// Content problems spotted in a generated item. Informational only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeIssue {
  EmptyText,
  EmptyCorrectAnswer,
  EmptyCategory,
  WrongDistractorCount(usize),
  DuplicateChoice(String),
  CategoryNotLowercase,
}

impl Question {
  /// All four choices in stored order: distractors first, then the answer.
  pub fn choices(&self) -> Vec<&str> {
    self.options.iter().map(String::as_str)
      .chain(std::iter::once(self.correct_answer.as_str()))
      .collect()
  }

  pub fn check_shape(&self) -> Vec<ShapeIssue> {
    let mut issues = vec![];
    if self.text.trim().is_empty() { issues.push(ShapeIssue::EmptyText); }
    if self.correct_answer.trim().is_empty() { issues.push(ShapeIssue::EmptyCorrectAnswer); }
    if self.category.trim().is_empty() { issues.push(ShapeIssue::EmptyCategory); }
    if self.category != self.category.to_lowercase() { issues.push(ShapeIssue::CategoryNotLowercase); }
    if self.options.len() != DISTRACTOR_COUNT {
      issues.push(ShapeIssue::WrongDistractorCount(self.options.len()));
    }

    let mut seen = HashSet::new();
    for choice in self.choices() {
      if !seen.insert(choice.trim().to_lowercase()) {
        issues.push(ShapeIssue::DuplicateChoice(choice.to_string()));
      }
    }
    issues
  }
}

/// Question texts that appear more than once in a set (case-insensitive).
pub fn find_duplicate_texts(questions: &[Question]) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut reported = HashSet::new();
  let mut dups = vec![];
  for q in questions {
    let key = q.text.trim().to_lowercase();
    if !seen.insert(key.clone()) && reported.insert(key) {
      dups.push(q.text.clone());
    }
  }
  dups
}

/// Clamp any requested count into [MIN_QUESTIONS, MAX_QUESTIONS].
pub fn effective_count(count: i64) -> usize {
  count.clamp(MIN_QUESTIONS, MAX_QUESTIONS) as usize
}

/// One user submission. Built, consumed once, discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
  pub topic: String,
  pub question_count: usize,
}

impl GenerationRequest {
  pub fn new(topic: &str, count: i64) -> Result<Self, QuizError> {
    let topic = topic.trim();
    if topic.is_empty() {
      return Err(QuizError::EmptyTopic);
    }
    Ok(Self { topic: topic.to_string(), question_count: effective_count(count) })
  }
}

#[cfg(test)]
pub(crate) fn sample_question() -> Question {
  Question {
    text: "Q1".into(),
    options: vec!["A".into(), "B".into(), "C".into()],
    correct_answer: "D".into(),
    category: "science".into(),
    difficulty: Difficulty::Medium,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn count_is_clamped_into_range() {
    assert_eq!(effective_count(2), 5);
    assert_eq!(effective_count(37), 20);
    assert_eq!(effective_count(12), 12);
    assert_eq!(effective_count(-4), 5);
    assert_eq!(effective_count(i64::MAX), 20);
    for n in -50..50 {
      assert_eq!(effective_count(n) as i64, n.max(5).min(20));
    }
  }

  #[test]
  fn request_trims_topic_and_rejects_blank() {
    let req = GenerationRequest::new("  Photosynthesis \n", 50).expect("valid");
    assert_eq!(req.topic, "Photosynthesis");
    assert_eq!(req.question_count, 20);

    assert!(matches!(GenerationRequest::new("", 10), Err(QuizError::EmptyTopic)));
    assert!(matches!(GenerationRequest::new(" \t ", 10), Err(QuizError::EmptyTopic)));
  }

  #[test]
  fn difficulty_parses_case_insensitively() {
    assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::parse(" HARD "), Some(Difficulty::Hard));
    assert_eq!(Difficulty::parse("trivial"), None);
  }

  #[test]
  fn wire_form_uses_capitalized_fields() {
    let v = serde_json::to_value(sample_question()).expect("serialize");
    assert_eq!(v["Text"], "Q1");
    assert_eq!(v["CorrectAnswer"], "D");
    assert_eq!(v["Difficulty"], "medium");
    assert_eq!(v["Options"].as_array().map(|a| a.len()), Some(3));
  }

  #[test]
  fn well_formed_question_has_no_issues() {
    assert!(sample_question().check_shape().is_empty());
  }

  #[test]
  fn shape_check_flags_duplicates_and_counts() {
    let mut q = sample_question();
    q.options = vec!["A".into(), "D".into()];
    q.category = "Science".into();
    let issues = q.check_shape();
    assert!(issues.contains(&ShapeIssue::WrongDistractorCount(2)));
    assert!(issues.contains(&ShapeIssue::DuplicateChoice("D".into())));
    assert!(issues.contains(&ShapeIssue::CategoryNotLowercase));
  }

  #[test]
  fn duplicate_question_texts_are_reported_once() {
    let a = sample_question();
    let mut b = sample_question();
    b.text = "q1 ".into();
    let mut c = sample_question();
    c.text = "Q2".into();
    assert_eq!(find_duplicate_texts(&[a.clone(), b, c, a]), vec!["q1 ".to_string()]);
  }
}
