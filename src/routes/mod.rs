//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - JSON API under `/api/v1/...`
/// - Static editor bundle from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/description/options", get(http::http_get_options))
        .route("/api/v1/description/topics", post(http::http_post_topics))
        .route("/api/v1/description/parse", post(http::http_post_parse))
        .route("/api/v1/description/serialize", post(http::http_post_serialize))
        .route("/api/v1/description/validate", post(http::http_post_validate))
        .route("/api/v1/description/generate", post(http::http_post_generate_description))
        .route("/api/v1/richtext/html", post(http::http_post_to_html))
        .route("/api/v1/richtext/paragraphs", post(http::http_post_paragraphs))
        .route("/api/v1/richtext/text", post(http::http_post_to_text))
        .route("/api/v1/chat", post(http::http_post_chat))
        .route("/api/v1/solution", post(http::http_post_solution))
        .route("/api/v1/testcases/categories", get(http::http_get_categories))
        .route("/api/v1/testcases/plan", post(http::http_post_plan))
        .route("/api/v1/testcases/generate", post(http::http_post_generate_testcases))
        .route("/api/v1/testcases/export", post(http::http_post_export))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Prompts;

    fn app() -> Router {
        build_router(Arc::new(AppState::with_parts(None, Prompts::default())))
    }

    async fn call(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_llm_state() {
        let (status, body) = call("GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "llm": false }));
    }

    #[tokio::test]
    async fn parse_then_serialize_over_http() {
        let text = "Problem Title: Two Sum\nDifficulty Level: Easy\nProblem Description: Find two numbers that add up to target.";
        let (status, parsed) = call("POST", "/api/v1/description/parse", Some(json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parsed["problemTitle"], "Two Sum");
        assert_eq!(parsed["difficultyLevel"], "Easy");
        assert_eq!(parsed["problemDescription"], "Find two numbers that add up to target.");
        assert_eq!(parsed["constraints"], "");

        let (status, out) = call("POST", "/api/v1/description/serialize", Some(parsed)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            out["text"],
            "Problem Title\nTwo Sum\n\nDifficulty Level\nEasy\n\nProblem Description\nFind two numbers that add up to target."
        );
    }

    #[tokio::test]
    async fn validate_lists_missing_sections() {
        let (status, report) =
            call("POST", "/api/v1/description/validate", Some(json!({ "problemTitle": "Two Sum" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["valid"], false);
        let errors = report["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e == "Problem description is required"));
        assert!(!errors.iter().any(|e| e == "Problem title is required"));
    }

    #[tokio::test]
    async fn description_options_and_topics() {
        let (status, options) = call("GET", "/api/v1/description/options", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(options["difficulties"], json!(["Easy", "Medium", "Hard", "Expert"]));
        assert_eq!(options["topics"].as_array().unwrap().len(), 19);

        let (_, topics) = call("POST", "/api/v1/description/topics", Some(json!({ "text": "Arrays ,, Hash Table," }))).await;
        assert_eq!(topics["topics"], json!(["Arrays", "Hash Table"]));
        assert_eq!(topics["text"], "Arrays, Hash Table");
    }

    #[tokio::test]
    async fn richtext_conversions() {
        let (_, html) = call("POST", "/api/v1/richtext/html", Some(json!({ "text": "**Title:** x" }))).await;
        assert_eq!(html["html"], "<p><strong>Title:</strong> x</p>");

        let (_, text) = call("POST", "/api/v1/richtext/text", Some(json!({ "html": "<p>Hello <b>world</b></p>" }))).await;
        assert_eq!(text["text"], "Hello world");

        let (_, paragraphs) = call("POST", "/api/v1/richtext/paragraphs", Some(json!({ "text": "a\nb\n\nc" }))).await;
        assert_eq!(paragraphs["html"], "<p>a<br>b</p><p>c</p>");
    }

    #[tokio::test]
    async fn testcase_planning_endpoints() {
        let (status, categories) = call("GET", "/api/v1/testcases/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(categories.as_array().unwrap().len(), 10);

        let configs = json!({ "testcaseConfigs": [
            { "category": "api", "weight": 60, "enabled": true },
            { "category": "security", "weight": 40, "enabled": true },
        ]});
        let (status, plan) = call("POST", "/api/v1/testcases/plan", Some(configs)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["totalWeight"], 100);
        assert_eq!(plan["balanced"], true);

        let huge = json!({ "testcaseConfigs": [
            { "category": "api", "weight": 3_000_000_000u32, "enabled": true },
            { "category": "security", "weight": 3_000_000_000u32, "enabled": true },
        ]});
        let (status, err) = call("POST", "/api/v1/testcases/plan", Some(huge)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].as_str().unwrap().contains("out of range"));

        let none = json!({ "testcaseConfigs": [{ "category": "api", "weight": 60, "enabled": false }] });
        let (status, err) = call("POST", "/api/v1/testcases/plan", Some(none)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].is_string());
    }

    #[tokio::test]
    async fn export_requires_a_description() {
        let (status, _) = call("POST", "/api/v1/testcases/export", Some(json!({ "description": " ", "testcases": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = json!({ "description": "<p>Build &amp; test</p>", "testcases": [] });
        let (status, export) = call("POST", "/api/v1/testcases/export", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(export["prompt"], "Build & test");
    }

    #[tokio::test]
    async fn llm_routes_are_unavailable_offline() {
        let (status, err) = call("POST", "/api/v1/chat", Some(json!({ "messages": [{ "role": "user", "content": "hi" }] }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(err["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }
}
