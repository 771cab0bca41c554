//! Application state: prompts, server knobs, and the optional quiz client.
//!
//! Nothing here is mutable after startup; each request gets an independent
//! generation call through the shared (cheaply cloned) client.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{load_quiz_config_from_env, QuizConfig, ServerCfg};
use crate::gemini::Gemini;
use crate::generator::TextGenerator;
use crate::openai::OpenAI;
use crate::quiz::QuizClient;

#[derive(Clone)]
pub struct AppState {
    pub quiz: Option<QuizClient>,
    pub server: ServerCfg,
}

impl AppState {
    /// Build state from env: load config, pick and construct the provider.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_quiz_config_from_env().unwrap_or_default();

        let provider = std::env::var("QUIZ_PROVIDER").unwrap_or_else(|_| "gemini".into());
        let generator: Option<Arc<dyn TextGenerator>> = match provider.trim().to_ascii_lowercase().as_str() {
            "openai" => OpenAI::from_env(&cfg.prompts.schema_system).map(|c| Arc::new(c) as Arc<dyn TextGenerator>),
            "gemini" => Gemini::from_env().map(|c| Arc::new(c) as Arc<dyn TextGenerator>),
            _ => None,
        };

        match &generator {
            Some(g) => info!(target: "quizgen_backend", provider = g.provider(), model = %g.model(), "Quiz generation enabled."),
            None => warn!(target: "quizgen_backend", %provider, "Quiz generation disabled (missing API key or unknown provider)."),
        }

        Self::with_generator(generator, cfg)
    }

    /// Explicit construction (tests, embedding).
    pub fn with_generator(generator: Option<Arc<dyn TextGenerator>>, cfg: QuizConfig) -> Self {
        Self {
            quiz: generator.map(|g| QuizClient::new(g, cfg.prompts)),
            server: cfg.server,
        }
    }
}
