//! Relay client: typed access to the gateway's generation and video-search
//! endpoints.
//!
//! Tab controllers depend on the [`RelayApi`] trait so orchestration logic can
//! be exercised against scripted fakes; [`RelayClient`] is the reqwest-backed
//! implementation pointed at a running gateway.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::prompts::translation_prompt;
use crate::shared::ChatMessage;

/// One search result before the per-video detail enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Parsed page of a video search response.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    /// Continuation token for the next page; `None` means the result set is
    /// exhausted.
    pub next_page_token: Option<String>,
}

/// Duration and view count from the per-video detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub duration: String,
    pub view_count: u64,
}

impl Default for VideoDetails {
    /// Fallback used when the detail fetch fails; mirrors the provider's
    /// zero-length duration encoding.
    fn default() -> Self {
        Self {
            duration: "PT0S".to_string(),
            view_count: 0,
        }
    }
}

/// Client-side view of the relay service.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Send a chat history to the generation endpoint and return the
    /// generated text.
    async fn generate(&self, messages: &[ChatMessage]) -> CoreResult<String>;

    /// One page of video search results.
    async fn search_videos(
        &self,
        query: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> CoreResult<SearchPage>;

    /// Duration and view count for a single video.
    async fn video_details(&self, video_id: &str) -> CoreResult<VideoDetails>;

    /// Translate free text via the generation endpoint. Callers decide what
    /// to do on failure (the video tab falls back to the original text).
    async fn translate(&self, text: &str, target_language: &str) -> CoreResult<String> {
        let prompt = translation_prompt(text, target_language);
        let result = self.generate(&[ChatMessage::user(prompt)]).await?;
        Ok(result.trim().to_string())
    }
}

/// reqwest-backed relay client.
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct GenerateResponse {
    result: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
    max_results: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    title: String,
    channel_title: String,
    published_at: Option<DateTime<Utc>>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailsRequest<'a> {
    video_id: &'a str,
}

#[derive(Deserialize)]
struct DetailsResponse {
    items: Vec<DetailsItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsItem {
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

impl RelayClient {
    /// Point the client at a gateway base URL (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> CoreResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let res = self.client.post(&url).json(body).send().await?;
        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CoreError::Relay(body));
        }
        Ok(res)
    }
}

#[async_trait]
impl RelayApi for RelayClient {
    async fn generate(&self, messages: &[ChatMessage]) -> CoreResult<String> {
        let res = self
            .post_json("/api/gemini/generate", &GenerateRequest { messages })
            .await?;
        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| CoreError::MalformedResponse(e.to_string()))?;
        Ok(parsed.result)
    }

    async fn search_videos(
        &self,
        query: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> CoreResult<SearchPage> {
        let res = self
            .post_json(
                "/api/youtube/search",
                &SearchRequest {
                    query,
                    page_token,
                    max_results,
                },
            )
            .await?;
        let parsed: SearchResponse = res
            .json()
            .await
            .map_err(|e| CoreError::MalformedResponse(e.to_string()))?;

        let hits = parsed
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let snippet = item.snippet?;
                let thumbnail_url = snippet
                    .thumbnails
                    .and_then(|t| t.medium.or(t.default))
                    .map(|t| t.url)
                    .unwrap_or_default();
                Some(SearchHit {
                    video_id,
                    title: snippet.title,
                    channel: snippet.channel_title,
                    thumbnail_url,
                    published_at: snippet.published_at,
                })
            })
            .collect();

        Ok(SearchPage {
            hits,
            next_page_token: parsed.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_details(&self, video_id: &str) -> CoreResult<VideoDetails> {
        let res = self
            .post_json("/api/youtube/details", &DetailsRequest { video_id })
            .await?;
        let parsed: DetailsResponse = res
            .json()
            .await
            .map_err(|e| CoreError::MalformedResponse(e.to_string()))?;

        let item = parsed
            .items
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::MalformedResponse("details response has no items".into()))?;
        let duration = item
            .content_details
            .and_then(|c| c.duration)
            .unwrap_or_else(|| "PT0S".to_string());
        let view_count = item
            .statistics
            .and_then(|s| s.view_count)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        Ok(VideoDetails {
            duration,
            view_count,
        })
    }
}
