//! Display-side helpers: shuffled answer choices and category filtering.
//!
//! Rendering never touches the stored `Question`; it only borrows it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::domain::{Difficulty, Question};

pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DisplayChoice {
  pub text: String,
  pub correct: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RenderedQuestion {
  /// 1-based position in the rendered list.
  pub number: usize,
  pub text: String,
  pub category: String,
  pub difficulty: Difficulty,
  pub choices: Vec<DisplayChoice>,
}

/// Distractors plus the correct answer in uniformly random order.
pub fn shuffle_choices<R: Rng + ?Sized>(q: &Question, rng: &mut R) -> Vec<DisplayChoice> {
  let mut choices: Vec<DisplayChoice> = q
    .options
    .iter()
    .map(|o| DisplayChoice { text: o.clone(), correct: false })
    .chain(std::iter::once(DisplayChoice { text: q.correct_answer.clone(), correct: true }))
    .collect();
  choices.shuffle(rng);
  choices
}

pub fn render_quiz<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Vec<RenderedQuestion> {
  questions
    .iter()
    .enumerate()
    .map(|(i, q)| RenderedQuestion {
      number: i + 1,
      text: q.text.clone(),
      category: q.category.clone(),
      difficulty: q.difficulty,
      choices: shuffle_choices(q, &mut *rng),
    })
    .collect()
}

/// Matching key for categories: lowercase, whitespace removed.
pub fn category_key(category: &str) -> String {
  category.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

/// Distinct categories in first-seen order (deduplicated by `category_key`).
pub fn categories(questions: &[Question]) -> Vec<String> {
  let mut keys: Vec<String> = vec![];
  let mut out = vec![];
  for q in questions {
    let key = category_key(&q.category);
    if !keys.contains(&key) {
      keys.push(key);
      out.push(q.category.clone());
    }
  }
  out
}

/// `"all"` keeps everything; anything else matches on `category_key`.
pub fn filter_by_category<'a>(questions: &'a [Question], category: &str) -> Vec<&'a Question> {
  if category.trim().eq_ignore_ascii_case(ALL_CATEGORIES) {
    return questions.iter().collect();
  }
  let wanted = category_key(category);
  questions.iter().filter(|q| category_key(&q.category) == wanted).collect()
}
