//! Video-search provider client. Payloads pass through verbatim; the client
//! only validates the shape the frontend depends on.

use std::time::Duration;

use crate::error::{RelayError, RelayResult};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Clone)]
pub struct YouTubeClient {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { api_key, client }
    }

    fn key(&self) -> RelayResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(RelayError::MissingKey("YouTube API"))
    }

    /// One page of video search results. The raw provider payload is returned
    /// as-is but must contain an `items` array.
    pub async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> RelayResult<serde_json::Value> {
        let key = self.key()?;

        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("key", key),
        ];
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params.push(("pageToken", token));
        }

        let res = self.client.get(SEARCH_URL).query(&params).send().await?;
        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                provider: "YouTube API",
                body,
            });
        }

        let data: serde_json::Value = res.json().await?;
        if !data.get("items").map(|i| i.is_array()).unwrap_or(false) {
            return Err(RelayError::MalformedSearch);
        }
        Ok(data)
    }

    /// `contentDetails` and `statistics` for one video, passed through raw.
    pub async fn details(&self, video_id: &str) -> RelayResult<serde_json::Value> {
        let key = self.key()?;
        if video_id.trim().is_empty() {
            return Err(RelayError::MissingVideoId);
        }

        let res = self
            .client
            .get(VIDEOS_URL)
            .query(&[
                ("part", "contentDetails,statistics"),
                ("id", video_id),
                ("key", key),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                provider: "YouTube 상세정보 API",
                body,
            });
        }

        Ok(res.json().await?)
    }
}
