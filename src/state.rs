//! Application state: prompts and the optional LLM client.
//!
//! The service keeps no per-session data; the client owns the conversation
//! and its memory and sends them with every request.

use tracing::{info, instrument};

use crate::config::{load_app_config_from_env, Prompts};
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load prompt config, init the LLM client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let prompts = load_app_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        // Build optional LLM client (if API key present).
        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "probforge", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "LLM enabled.");
        } else {
            info!(target: "probforge", "LLM disabled (no OPENAI_API_KEY). Only parsing, conversion and planning endpoints are usable.");
        }

        Self::with_parts(openai, prompts)
    }

    pub fn with_parts(openai: Option<OpenAI>, prompts: Prompts) -> Self {
        Self { openai, prompts }
    }

    pub fn llm_enabled(&self) -> bool {
        self.openai.is_some()
    }
}
