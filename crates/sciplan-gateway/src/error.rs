//! Relay error taxonomy. Every failure is caught at the route boundary and
//! converted to the uniform `{"error": message}` JSON shape with HTTP 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result type alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    /// The server-held credential for the named provider is unset. Checked
    /// before any upstream call.
    #[error("{0} 키가 설정되지 않았습니다.")]
    MissingKey(&'static str),

    /// Non-OK upstream response, wrapped with the upstream body text.
    #[error("{provider} 요청 실패: {body}")]
    Upstream { provider: &'static str, body: String },

    /// The generation provider answered without any candidate text.
    #[error("Gemini API 응답에 텍스트가 없습니다.")]
    EmptyCompletion,

    /// The search provider answered without an `items` array.
    #[error("YouTube API 응답 형식이 올바르지 않습니다.")]
    MalformedSearch,

    /// The generate request carried no user-role message.
    #[error("요청에 user 메시지가 없습니다.")]
    MissingUserMessage,

    /// The details request carried no video id.
    #[error("비디오 ID가 필요합니다.")]
    MissingVideoId,

    #[error("업스트림 요청 중 오류가 발생했습니다: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "relay request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}
