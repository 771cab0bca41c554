//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::State,
  http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
  response::{IntoResponse, Response},
  Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, instrument};

use crate::error::QuizError;
use crate::export::{download_filename, to_pretty_json};
use crate::protocol::*;
use crate::render::{categories, filter_by_category, render_quiz};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut {
    ok: true,
    provider: state.quiz.as_ref().map(|q| q.provider()),
    model: state.quiz.as_ref().map(|q| q.model().to_string()),
  })
}

/// Generate a quiz. The deadline is applied here, around the core call.
#[instrument(level = "info", skip(state, body), fields(topic_len = body.topic.len(), count = body.count()))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<GenerateIn>,
) -> Result<Json<GenerateOut>, QuizError> {
  let quiz = state.quiz.as_ref().ok_or(QuizError::Unavailable)?;
  let deadline = state.server.request_timeout();

  let questions = tokio::time::timeout(deadline, quiz.generate_quiz_questions(&body.topic, body.count()))
    .await
    .map_err(|_| {
      error!(target: "quiz", ?deadline, "Quiz generation timed out");
      QuizError::Timeout(deadline)
    })??;

  info!(target: "quiz", returned = questions.len(), "HTTP quiz served");
  Ok(Json(GenerateOut { topic: body.topic.trim().to_string(), count: questions.len(), questions }))
}

#[instrument(level = "info", skip(body), fields(questions = body.questions.len(), category = ?body.category, seed = ?body.seed))]
pub async fn http_post_render(ApiJson(body): ApiJson<RenderIn>) -> impl IntoResponse {
  let mut rng = match body.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let selected: Vec<_> = match body.category.as_deref() {
    Some(cat) => filter_by_category(&body.questions, cat).into_iter().cloned().collect(),
    None => body.questions.clone(),
  };
  Json(RenderOut {
    categories: categories(&body.questions),
    questions: render_quiz(&selected, &mut rng),
  })
}

#[instrument(level = "info", skip(body), fields(questions = body.questions.len()))]
pub async fn http_post_export(ApiJson(body): ApiJson<ExportIn>) -> Response {
  match to_pretty_json(&body.questions) {
    Ok(json) => {
      let disposition = format!("attachment; filename=\"{}\"", download_filename(&body.topic));
      (
        [(CONTENT_TYPE, "application/json; charset=utf-8".to_string()), (CONTENT_DISPOSITION, disposition)],
        json,
      )
        .into_response()
    }
    Err(e) => {
      error!(target: "quizgen_backend", error = %e, "Export serialization failed");
      (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorOut { error: "Failed to export quiz.".into(), kind: "export", detail: Some(e.to_string()) }),
      )
        .into_response()
    }
  }
}
