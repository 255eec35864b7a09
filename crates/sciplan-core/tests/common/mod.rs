//! Scripted relay fake shared by the orchestration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use sciplan_core::api::{RelayApi, SearchHit, SearchPage, VideoDetails};
use sciplan_core::{ChatMessage, CoreError, CoreResult};

#[derive(Default)]
pub struct MockRelay {
    generate_prompts: Mutex<Vec<String>>,
    generate_responses: Mutex<VecDeque<CoreResult<String>>>,
    search_calls: AtomicUsize,
    search_requests: Mutex<Vec<(String, Option<String>, u32)>>,
    search_pages: Mutex<VecDeque<SearchPage>>,
    search_gate: Mutex<Option<Arc<Notify>>>,
    details_calls: AtomicUsize,
    details_fail: AtomicBool,
}

impl MockRelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_generate(&self, response: CoreResult<String>) {
        self.generate_responses.lock().unwrap().push_back(response);
    }

    pub fn push_search_page(&self, page: SearchPage) {
        self.search_pages.lock().unwrap().push_back(page);
    }

    /// Block the next search calls until the returned handle is notified.
    pub fn hold_search(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.search_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_details(&self) {
        self.details_fail.store(true, Ordering::SeqCst);
    }

    pub fn generate_count(&self) -> usize {
        self.generate_prompts.lock().unwrap().len()
    }

    pub fn generate_prompt(&self, index: usize) -> String {
        self.generate_prompts.lock().unwrap()[index].clone()
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn search_request(&self, index: usize) -> (String, Option<String>, u32) {
        self.search_requests.lock().unwrap()[index].clone()
    }

    pub fn details_count(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    pub fn hit(id: &str) -> SearchHit {
        SearchHit {
            video_id: id.to_string(),
            title: format!("{id} 실험 영상"),
            channel: "과학 채널".to_string(),
            thumbnail_url: format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"),
            published_at: None,
        }
    }

    pub fn page(ids: &[&str], token: Option<&str>) -> SearchPage {
        SearchPage {
            hits: ids.iter().map(|id| Self::hit(id)).collect(),
            next_page_token: token.map(str::to_string),
        }
    }
}

#[async_trait]
impl RelayApi for MockRelay {
    async fn generate(&self, messages: &[ChatMessage]) -> CoreResult<String> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.generate_prompts.lock().unwrap().push(prompt);
        match self.generate_responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok("generated".to_string()),
        }
    }

    async fn search_videos(
        &self,
        query: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> CoreResult<SearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_requests.lock().unwrap().push((
            query.to_string(),
            page_token.map(str::to_string),
            max_results,
        ));
        let gate = self.search_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(self
            .search_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn video_details(&self, _video_id: &str) -> CoreResult<VideoDetails> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        if self.details_fail.load(Ordering::SeqCst) {
            return Err(CoreError::Relay("details unavailable".to_string()));
        }
        Ok(VideoDetails {
            duration: "PT4M13S".to_string(),
            view_count: 15_300,
        })
    }
}
