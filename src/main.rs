//! ProbForge · Coding Problem Authoring Backend
//!
//! - Axum HTTP + WebSocket API
//! - Structured problem descriptions (parse, serialize, validate)
//! - Optional OpenAI integration for the requirements chat, description,
//!   solution and test case generation (via environment variables)
//! - Static editor fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   OPENAI_API_KEY        : enables OpenAI integration if present
//!   OPENAI_BASE_URL       : default "https://api.openai.com/v1"
//!   OPENAI_FAST_MODEL     : default "gpt-4o-mini"
//!   OPENAI_STRONG_MODEL   : default "gpt-4o"
//!   OPENAI_TIMEOUT_SECS   : request timeout (default 60)
//!   PROBFORGE_CONFIG_PATH : path to TOML config (prompt templates)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod description;
mod richtext;
mod chat;
mod solution;
mod testcases;
mod state;
mod protocol;
mod logic;
mod openai;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Prompts and the optional OpenAI client.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "probforge", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
