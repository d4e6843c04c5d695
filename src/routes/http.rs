//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs sizes and basic result info.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{info, instrument, warn};

use crate::description::{parse_description, serialize_description, ParsedDescription};
use crate::domain::{format_topics, parse_topics, validate_description, Difficulty, ValidationReport, COMMON_TOPICS};
use crate::logic::*;
use crate::protocol::*;
use crate::richtext::{html_to_text, plain_text_to_html, text_to_html};
use crate::solution::SolutionRequest;
use crate::state::AppState;
use crate::testcases::{TestcaseCategory, TestcaseExport, TestcasePlan};

impl IntoResponse for ServiceError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    if status.is_server_error() {
      warn!(target: "probforge", %status, error = %self, "Request failed");
    }
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, llm: state.llm_enabled() })
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_parse(Json(body): Json<TextIn>) -> Json<ParsedDescription> {
  let description = parse_description(&body.text);
  info!(target: "description", sections = description.filled(), "HTTP description parsed");
  Json(description)
}

#[instrument(level = "info", skip(body))]
pub async fn http_post_serialize(Json(body): Json<ParsedDescription>) -> Json<TextOut> {
  Json(TextOut { text: serialize_description(&body) })
}

#[instrument(level = "info", skip(body))]
pub async fn http_post_validate(Json(body): Json<ParsedDescription>) -> Json<ValidationReport> {
  let report = validate_description(&body);
  info!(target: "description", valid = report.valid, errors = report.errors.len(), "HTTP description validated");
  Json(report)
}

#[instrument(level = "info")]
pub async fn http_get_options() -> Json<OptionsOut> {
  Json(OptionsOut {
    difficulties: Difficulty::ALL.iter().map(|d| d.as_str()).collect(),
    topics: &COMMON_TOPICS,
  })
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_topics(Json(body): Json<TextIn>) -> Json<TopicsOut> {
  let topics = parse_topics(&body.text);
  let text = format_topics(&topics);
  Json(TopicsOut { topics, text })
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_to_html(Json(body): Json<TextIn>) -> Json<HtmlOut> {
  Json(HtmlOut { html: text_to_html(&body.text) })
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_paragraphs(Json(body): Json<TextIn>) -> Json<HtmlOut> {
  Json(HtmlOut { html: plain_text_to_html(&body.text) })
}

#[instrument(level = "info", skip(body), fields(html_len = body.html.len()))]
pub async fn http_post_to_text(Json(body): Json<HtmlIn>) -> Json<TextOut> {
  Json(TextOut { text: html_to_text(&body.html) })
}

#[instrument(level = "info", skip(state, body), fields(messages = body.messages.len()))]
pub async fn http_post_chat(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChatIn>,
) -> Result<Json<ChatOut>, ServiceError> {
  let turn = do_chat_turn(&state, &body.messages, body.memory).await?;
  Ok(Json(ChatOut { reply: turn.reply, raw: turn.raw, memory: turn.memory }))
}

#[instrument(level = "info", skip(state, body), fields(messages = body.messages.len()))]
pub async fn http_post_generate_description(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChatIn>,
) -> Result<Json<DescriptionOut>, ServiceError> {
  let (raw, description) = do_generate_description(&state, &body.messages, body.memory.as_ref()).await?;
  let html = text_to_html(&serialize_description(&description));
  Ok(Json(DescriptionOut { raw, description, html }))
}

#[instrument(level = "info", skip(state, body), fields(language = %body.language))]
pub async fn http_post_solution(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SolutionRequest>,
) -> Result<Json<SolutionOut>, ServiceError> {
  let solution = do_generate_solution(&state, &body).await?;
  Ok(Json(SolutionOut { solution }))
}

#[instrument(level = "info")]
pub async fn http_get_categories() -> Json<Vec<CategoryOut>> {
  Json(TestcaseCategory::ALL.iter().map(|c| category_out(*c)).collect())
}

#[instrument(level = "info", skip(body), fields(configs = body.testcase_configs.len()))]
pub async fn http_post_plan(Json(body): Json<PlanIn>) -> Result<Json<PlanOut>, ServiceError> {
  let plan = TestcasePlan::from_configs(&body.testcase_configs)?;
  Ok(Json(plan.into()))
}

#[instrument(level = "info", skip(state, body), fields(description_len = body.project_description.len(), configs = body.testcase_configs.len()))]
pub async fn http_post_generate_testcases(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TestcasesIn>,
) -> Result<Json<TestcasesOut>, ServiceError> {
  let testcases = do_generate_testcases(&state, &body.project_description, &body.testcase_configs).await?;
  Ok(Json(TestcasesOut { testcases }))
}

#[instrument(level = "info", skip(body), fields(testcases = body.testcases.len()))]
pub async fn http_post_export(Json(body): Json<ExportIn>) -> impl IntoResponse {
  if body.description.trim().is_empty() {
    return ServiceError::MissingDescription.into_response();
  }
  let export = TestcaseExport::build(&body.description, body.testcases);
  info!(target: "testcases", count = export.testcases.len(), prompt_len = export.prompt.len(), "HTTP export built");
  (StatusCode::OK, Json(export)).into_response()
}
