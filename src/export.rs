//! JSON export of a generated quiz (the copy / download payload).

use crate::domain::Question;
use crate::util::slugify;

/// Pretty JSON, two-space indent, wire field names.
pub fn to_pretty_json(questions: &[Question]) -> Result<String, serde_json::Error> {
  serde_json::to_string_pretty(questions)
}

/// `"The Solar System"` -> `"the_solar_system_quiz.json"`.
pub fn download_filename(topic: &str) -> String {
  let kept: String = topic
    .chars()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-'))
    .collect();
  let slug = slugify(&kept, "_");
  if slug.is_empty() { "quiz.json".into() } else { format!("{slug}_quiz.json") }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::sample_question;

  #[test]
  fn pretty_json_keeps_wire_names() {
    let json = to_pretty_json(&[sample_question()]).expect("serialize");
    assert!(json.starts_with("[\n  {\n    \"Text\": \"Q1\""));
    let back: Vec<Question> = serde_json::from_str(&json).expect("parse back");
    assert_eq!(back, vec![sample_question()]);
  }

  #[test]
  fn filename_is_slugged() {
    assert_eq!(download_filename("The Solar  System"), "the_solar_system_quiz.json");
    assert_eq!(download_filename("C++ / \"Rust\""), "c_rust_quiz.json");
    assert_eq!(download_filename("   "), "quiz.json");
  }
}
