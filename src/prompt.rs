//! Prompt builder: turns (topic, count) into the instruction text and the
//! output schema handed to the model.
//!
//! The schema is plain data (`SchemaDescriptor`), not derived from `Question`.
//! `quiz::map_question` is the bridge between the two shapes.

use serde::Serialize;

use crate::config::Prompts;
use crate::domain::effective_count;
use crate::util::fill_template;

/// Kinds understood by schema-capable providers (serialized upper-case).
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
  Array,
  Object,
  String,
}

/// Declarative description of the JSON the model must return.
/// Properties keep insertion order so the serialized schema is stable.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
  #[serde(rename = "type")]
  pub kind: SchemaType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub items: Option<Box<SchemaDescriptor>>,
  #[serde(skip_serializing_if = "Option::is_none", serialize_with = "ser_properties")]
  pub properties: Option<Vec<(String, SchemaDescriptor)>>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,
}

fn ser_properties<S: serde::Serializer>(
  props: &Option<Vec<(String, SchemaDescriptor)>>,
  ser: S,
) -> Result<S::Ok, S::Error> {
  use serde::ser::SerializeMap;
  let props = props.as_deref().unwrap_or_default();
  let mut map = ser.serialize_map(Some(props.len()))?;
  for (k, v) in props {
    map.serialize_entry(k, v)?;
  }
  map.end()
}

impl SchemaDescriptor {
  pub fn of(kind: SchemaType) -> Self {
    Self { kind, description: None, items: None, properties: None, required: vec![] }
  }

  pub fn string(description: &str) -> Self {
    Self { description: Some(description.into()), ..Self::of(SchemaType::String) }
  }

  pub fn array(items: SchemaDescriptor, description: Option<&str>) -> Self {
    Self {
      kind: SchemaType::Array,
      description: description.map(Into::into),
      items: Some(Box::new(items)),
      properties: None,
      required: vec![],
    }
  }

  /// Object whose listed properties are all required.
  pub fn object(props: Vec<(&str, SchemaDescriptor)>) -> Self {
    let required = props.iter().map(|(k, _)| k.to_string()).collect();
    Self {
      kind: SchemaType::Object,
      description: None,
      items: None,
      properties: Some(props.into_iter().map(|(k, v)| (k.to_string(), v)).collect()),
      required,
    }
  }
}

/// The array-of-question shape requested from the model.
pub fn question_list_schema() -> SchemaDescriptor {
  let item = SchemaDescriptor::object(vec![
    ("Text", SchemaDescriptor::string("The quiz question text.")),
    (
      "Options",
      SchemaDescriptor::array(
        SchemaDescriptor::of(SchemaType::String),
        Some("A list of three realistic but incorrect answers (distractors)."),
      ),
    ),
    ("CorrectAnswer", SchemaDescriptor::string("The single correct answer.")),
    ("Category", SchemaDescriptor::string("The category or subject derived from the user topic, in lowercase.")),
    ("Difficulty", SchemaDescriptor::string("The difficulty level, must be \"medium\".")),
  ]);
  SchemaDescriptor::array(item, None)
}

/// Instruction text for one generation, from the given template.
pub fn build_prompt(prompts: &Prompts, topic: &str, count: i64) -> String {
  let n = effective_count(count).to_string();
  fill_template(&prompts.quiz_template, &[("count", &n), ("topic", topic)])
}

/// Pure: (topic, count) -> (instruction text, output schema), default template.
#[cfg(test)]
pub fn build_request(topic: &str, count: i64) -> (String, SchemaDescriptor) {
  build_request_with(&Prompts::default(), topic, count)
}

/// Pure: (topic, count) -> (instruction text, output schema) for the configured template.
pub fn build_request_with(prompts: &Prompts, topic: &str, count: i64) -> (String, SchemaDescriptor) {
  (build_prompt(prompts, topic, count), question_list_schema())
}
