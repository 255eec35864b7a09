//! Route handlers and router assembly.
//!
//! Every handler returns `Result<Json<_>, RelayError>`; the error half renders
//! as HTTP 500 with the uniform `{"error": message}` body. Static assets are
//! served from the configured directory with explicit content types for
//! `.css`/`.js`.

use std::path::Path;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use sciplan_core::ChatMessage;

use crate::error::{RelayError, RelayResult};
use crate::providers::{GeminiClient, YouTubeClient};

/// Generous body limit: the reference content forwarded with generation
/// requests can be a whole uploaded document.
const BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub gemini: GeminiClient,
    pub youtube: YouTubeClient,
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub messages: Vec<ChatMessage>,
}

fn default_max_results() -> u32 {
    12
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRequest {
    #[serde(default)]
    pub video_id: String,
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/health", get(health))
        .route("/api/gemini/generate", post(generate_handler))
        .route("/api/youtube/search", post(search_handler))
        .route("/api/youtube/details", post(details_handler))
        .with_state(state)
        .fallback_service(assets)
        .layer(middleware::from_fn(static_mime_overrides))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

async fn health() -> &'static str {
    "OK"
}

/// The last user-role message is the prompt; earlier turns and other roles
/// are ignored.
fn last_user_prompt(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
}

/// POST /api/gemini/generate — forwards the last user-role message to the
/// generation provider and answers `{"result": text}`.
async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> RelayResult<Json<serde_json::Value>> {
    let prompt = last_user_prompt(&req.messages).ok_or(RelayError::MissingUserMessage)?;

    let result = state.gemini.generate(prompt).await?;
    Ok(Json(serde_json::json!({ "result": result })))
}

/// POST /api/youtube/search — proxies one search page; the provider payload
/// passes through verbatim.
async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> RelayResult<Json<serde_json::Value>> {
    let data = state
        .youtube
        .search(&req.query, req.page_token.as_deref(), req.max_results)
        .await?;
    Ok(Json(data))
}

/// POST /api/youtube/details — proxies the per-video detail payload.
async fn details_handler(
    State(state): State<AppState>,
    Json(req): Json<DetailsRequest>,
) -> RelayResult<Json<serde_json::Value>> {
    let data = state.youtube.details(&req.video_id).await?;
    Ok(Json(data))
}

/// Explicit content types for stylesheet and script assets, matching what the
/// frontend expects regardless of the platform's MIME tables.
async fn static_mime_overrides(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let mut res = next.run(req).await;
    if path.ends_with(".css") {
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/css"));
    } else if path.ends_with(".js") {
        res.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/javascript"),
        );
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router(gemini_key: Option<&str>, youtube_key: Option<&str>) -> Router {
        let state = AppState {
            gemini: GeminiClient::new(gemini_key.map(str::to_string)),
            youtube: YouTubeClient::new(youtube_key.map(str::to_string)),
        };
        let dir = std::env::temp_dir();
        router(state, &dir)
    }

    async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                HttpRequest::post(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn generate_without_key_is_500_with_error_body() {
        let (status, body) = post_json(
            test_router(None, Some("yt-key")),
            "/api/gemini/generate",
            serde_json::json!({ "messages": [{ "role": "user", "content": "프롬프트" }] }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(message.contains("Gemini API"));
    }

    #[tokio::test]
    async fn generate_without_user_message_is_rejected() {
        let (status, body) = post_json(
            test_router(Some("gm-key"), None),
            "/api/gemini/generate",
            serde_json::json!({ "messages": [{ "role": "system", "content": "지침" }] }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("user"));
    }

    #[tokio::test]
    async fn search_without_key_is_500_with_error_body() {
        let (status, body) = post_json(
            test_router(Some("gm-key"), None),
            "/api/youtube/search",
            serde_json::json!({ "query": "science force experiment education" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("YouTube API"));
    }

    #[tokio::test]
    async fn details_without_video_id_is_rejected_before_any_upstream_call() {
        let (status, body) = post_json(
            test_router(None, Some("yt-key")),
            "/api/youtube/details",
            serde_json::json!({ "videoId": "" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"].as_str().unwrap(), "비디오 ID가 필요합니다.");
    }

    #[test]
    fn the_last_user_message_is_the_prompt() {
        let messages = vec![
            ChatMessage {
                role: "user".to_string(),
                content: "첫 번째 질문".to_string(),
            },
            ChatMessage {
                role: "assistant".to_string(),
                content: "답변".to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: "두 번째 질문".to_string(),
            },
            ChatMessage {
                role: "system".to_string(),
                content: "지침".to_string(),
            },
        ];

        assert_eq!(last_user_prompt(&messages), Some("두 번째 질문"));
        assert_eq!(last_user_prompt(&[]), None);
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_router(None, None)
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
