//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::Question;
use crate::error::QuizError;
use crate::render::RenderedQuestion;

pub const DEFAULT_COUNT: i64 = 10;

/// JSON body extractor whose rejections come back as `ErrorOut`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(QuizError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for QuizError {
    fn from(rejection: JsonRejection) -> Self {
        QuizError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    pub topic: String,
    /// Any JSON number; clamped into [5, 20] by the prompt builder, never rejected.
    #[serde(default)]
    pub count: Option<Number>,
}

impl GenerateIn {
    /// Requested count as `i64`, saturating out-of-range and fractional numbers.
    pub fn count(&self) -> i64 {
        match &self.count {
            None => DEFAULT_COUNT,
            Some(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|_| i64::MAX))
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(DEFAULT_COUNT),
        }
    }
}

#[derive(Serialize)]
pub struct GenerateOut {
    pub topic: String,
    /// Number of questions actually returned.
    pub count: usize,
    pub questions: Vec<Question>,
}

#[derive(Deserialize)]
pub struct RenderIn {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub category: Option<String>,
    /// Fixes the shuffle order when present.
    #[serde(default)]
    pub seed: Option<u64>,
}
#[derive(Serialize)]
pub struct RenderOut {
    pub categories: Vec<String>,
    pub questions: Vec<RenderedQuestion>,
}

#[derive(Deserialize)]
pub struct ExportIn {
    pub topic: String,
    pub questions: Vec<Question>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub provider: Option<&'static str>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl QuizError {
    pub fn status(&self) -> StatusCode {
        match self {
            QuizError::EmptyTopic | QuizError::BadRequest(_) => StatusCode::BAD_REQUEST,
            QuizError::Transport(_) | QuizError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            QuizError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            QuizError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let body = ErrorOut {
            error: self.user_message(),
            kind: self.kind(),
            detail: self.detail().map(str::to_string),
        };
        (self.status(), Json(body)).into_response()
    }
}
