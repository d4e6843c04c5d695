//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - One requirements-conversation turn (prompt assembly, reply decoding, memory update)
//!   - Description generation followed by section parsing
//!   - Reference solution generation
//!   - Weighted test case generation

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::chat::{
  assemble_messages, build_system_prompt, AssistantReply, ChatAction, ChatMemory, ChatMessage,
  DESCRIPTION_REQUEST,
};
use crate::description::{parse_description, ParsedDescription};
use crate::openai::{LlmError, OpenAI};
use crate::solution::{clean_solution, SolutionRequest};
use crate::state::AppState;
use crate::testcases::{parse_generated_testcases, Testcase, TestcaseConfig, TestcaseError, TestcasePlan};
use crate::util::{fill_template, trunc_for_log};

#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("LLM integration is not configured (set OPENAI_API_KEY)")]
  LlmDisabled,
  #[error(transparent)]
  Llm(#[from] LlmError),
  #[error(transparent)]
  Testcases(#[from] TestcaseError),
  #[error("AI returned empty solution. Please try again.")]
  EmptySolution,
  #[error("Project description is required")]
  MissingDescription,
}

impl ServiceError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      ServiceError::LlmDisabled => StatusCode::SERVICE_UNAVAILABLE,
      ServiceError::Llm(LlmError::Http { status: 429, .. }) => StatusCode::TOO_MANY_REQUESTS,
      ServiceError::Llm(LlmError::Http { status: 402, .. }) => StatusCode::PAYMENT_REQUIRED,
      ServiceError::Llm(_) => StatusCode::BAD_GATEWAY,
      ServiceError::Testcases(TestcaseError::Parse(_)) => StatusCode::INTERNAL_SERVER_ERROR,
      ServiceError::Testcases(_) => StatusCode::BAD_REQUEST,
      ServiceError::EmptySolution => StatusCode::INTERNAL_SERVER_ERROR,
      ServiceError::MissingDescription => StatusCode::BAD_REQUEST,
    }
  }
}

fn llm(state: &AppState) -> Result<&OpenAI, ServiceError> {
  state.openai.as_ref().ok_or(ServiceError::LlmDisabled)
}

pub struct ChatTurn {
  pub reply: AssistantReply,
  pub raw: String,
  pub memory: ChatMemory,
}

#[instrument(level = "info", skip(state, messages, memory), fields(messages = messages.len(), has_memory = memory.is_some()))]
pub async fn do_chat_turn(
  state: &AppState,
  messages: &[ChatMessage],
  memory: Option<ChatMemory>,
) -> Result<ChatTurn, ServiceError> {
  let oa = llm(state)?;
  let system = build_system_prompt(&state.prompts, memory.as_ref(), ChatAction::Converse);
  let raw = oa.chat_turn(assemble_messages(system, messages)).await.map_err(|e| {
    error!(target: "chat", error = %e, "Chat turn failed");
    e
  })?;

  let reply = AssistantReply::parse_or_text(&raw);
  let mut memory = memory.unwrap_or_default();
  memory.observe_reply(&raw, &reply);
  let kind = match &reply {
    AssistantReply::Text { .. } => "text",
    AssistantReply::Question { .. } => "question",
  };
  info!(target: "chat", kind, ready = memory.ready_to_generate, "Assistant turn");
  Ok(ChatTurn { reply, raw, memory })
}

#[instrument(level = "info", skip(state, messages, memory), fields(messages = messages.len()))]
pub async fn do_generate_description(
  state: &AppState,
  messages: &[ChatMessage],
  memory: Option<&ChatMemory>,
) -> Result<(String, ParsedDescription), ServiceError> {
  let oa = llm(state)?;
  let system = build_system_prompt(&state.prompts, memory, ChatAction::GenerateDescription);
  let mut history = messages.to_vec();
  history.push(ChatMessage::user(DESCRIPTION_REQUEST));

  let raw = oa.generate_description(assemble_messages(system, &history)).await.map_err(|e| {
    error!(target: "description", error = %e, "Description generation failed");
    e
  })?;
  let description = parse_description(&raw);
  info!(target: "description", raw_len = raw.len(), sections = description.filled(), "Description generated and parsed");
  Ok((raw, description))
}

#[instrument(level = "info", skip(state, req), fields(language = %req.language, difficulty = %req.difficulty, problem_len = req.problem_description.len()))]
pub async fn do_generate_solution(state: &AppState, req: &SolutionRequest) -> Result<String, ServiceError> {
  if req.problem_description.trim().is_empty() {
    return Err(ServiceError::MissingDescription);
  }
  let oa = llm(state)?;
  let (system, user) = req.prompts(&state.prompts);
  let raw = oa.generate_solution(&system, &user).await?;
  let solution = clean_solution(&raw).ok_or(ServiceError::EmptySolution)?;
  debug!(target: "probforge", solution_len = solution.len(), "Solution cleaned");
  Ok(solution)
}

#[instrument(level = "info", skip(state, description, configs), fields(description_len = description.len(), configs = configs.len()))]
pub async fn do_generate_testcases(
  state: &AppState,
  description: &str,
  configs: &[TestcaseConfig],
) -> Result<Vec<Testcase>, ServiceError> {
  if description.trim().is_empty() {
    return Err(ServiceError::MissingDescription);
  }
  let plan = TestcasePlan::from_configs(configs)?;
  let oa = llm(state)?;

  let instructions = plan.instructions();
  let system = fill_template(
    &state.prompts.testcases_system_template,
    &[("category_instructions", instructions.as_str())],
  );
  let user = fill_template(&state.prompts.testcases_user_template, &[("description", description)]);

  let raw = oa.generate_testcases(&system, &user).await?;
  let testcases = parse_generated_testcases(&raw).map_err(|e| {
    error!(target: "testcases", error = %e, raw = %trunc_for_log(&raw, 300), "Generated testcases were not valid JSON");
    e
  })?;
  info!(target: "testcases", count = testcases.len(), categories = plan.entries.len(), balanced = plan.is_balanced(), "Testcases generated");
  Ok(testcases)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Prompts;
  use crate::testcases::TestcaseCategory;

  fn offline() -> AppState {
    AppState::with_parts(None, Prompts::default())
  }

  #[tokio::test]
  async fn llm_calls_fail_fast_when_disabled() {
    let state = offline();
    let err = do_chat_turn(&state, &[ChatMessage::user("hi")], None).await.err().unwrap();
    assert!(matches!(err, ServiceError::LlmDisabled));
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let err = do_generate_description(&state, &[], None).await.err().unwrap();
    assert!(matches!(err, ServiceError::LlmDisabled));
  }

  #[tokio::test]
  async fn invalid_inputs_are_rejected_before_the_llm() {
    let state = offline();
    let req = SolutionRequest { problem_description: "  ".into(), language: "rust".into(), difficulty: "Easy".into() };
    let err = do_generate_solution(&state, &req).await.err().unwrap();
    assert!(matches!(err, ServiceError::MissingDescription));

    let configs = [TestcaseConfig { category: TestcaseCategory::Api, weight: 100, enabled: false }];
    let err = do_generate_testcases(&state, "A project", &configs).await.err().unwrap();
    assert!(matches!(err, ServiceError::Testcases(TestcaseError::NoCategoriesEnabled)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn provider_status_codes_pass_through() {
    let limited = ServiceError::Llm(LlmError::Http { status: 429, message: "slow down".into() });
    assert_eq!(limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let unpaid = ServiceError::Llm(LlmError::Http { status: 402, message: "credits".into() });
    assert_eq!(unpaid.status_code(), StatusCode::PAYMENT_REQUIRED);
    let broken = ServiceError::Llm(LlmError::Http { status: 500, message: "oops".into() });
    assert_eq!(broken.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(ServiceError::Llm(LlmError::Empty).status_code(), StatusCode::BAD_GATEWAY);
  }
}
