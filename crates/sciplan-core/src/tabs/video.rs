//! Video recommendation tab: curriculum-driven search with incremental
//! paginated loading.
//!
//! The curriculum base query is `science {element} experiment education`,
//! where the element is the first selected content element translated to
//! English (static table, then a translation call, then the original text).
//! Further loads are guarded against concurrent fetches and against fetching
//! past the last continuation token; the scroll-triggered path is debounced
//! by a fixed delay.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::task::JoinHandle;

use crate::api::{RelayApi, VideoDetails};
use crate::curriculum::english_term;
use crate::error::{CoreError, CoreResult};
use crate::shared::{CurriculumSelection, Video};
use crate::store::AppStore;
use crate::tabs::{TabController, TabKind};

const VIDEOS_PER_PAGE: u32 = 12;
const SCROLL_DEBOUNCE: Duration = Duration::from_millis(1500);

const KOREAN_FILTERS: [&str; 8] = [
    "화학",
    "물리",
    "생물",
    "지구과학",
    "실험실",
    "시연",
    "과학교육",
    "고등학교",
];
const ENGLISH_FILTERS: [&str; 10] = [
    "chemistry",
    "physics",
    "biology",
    "earth science",
    "laboratory",
    "demonstration",
    "educational science",
    "high school",
    "middle school",
    "elementary school",
];

/// Suggested filter tags: static lists plus the selected curriculum elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSuggestions {
    pub korean: Vec<String>,
    pub english: Vec<String>,
}

#[derive(Default)]
struct SearchState {
    /// Curriculum-derived query every search is anchored to.
    base_query: Option<String>,
    current_query: Option<String>,
    next_page_token: Option<String>,
    has_more: bool,
    is_loading: bool,
    /// First page of a fresh search replaces the stored list.
    replace_results: bool,
}

pub struct VideoTab {
    store: Arc<AppStore>,
    relay: Arc<dyn RelayApi>,
    state: Mutex<SearchState>,
    debounce: Mutex<Option<JoinHandle<()>>>,
    last_error: Mutex<Option<String>>,
}

/// Clears the pending-fetch flag on every exit path of a load.
struct FetchFlag<'a>(&'a VideoTab);

impl Drop for FetchFlag<'_> {
    fn drop(&mut self) {
        self.0.state().is_loading = false;
    }
}

impl VideoTab {
    pub fn new(store: Arc<AppStore>, relay: Arc<dyn RelayApi>) -> Self {
        Self {
            store,
            relay,
            state: Mutex::new(SearchState::default()),
            debounce: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// A completed curriculum selection establishes the base query and starts
    /// a fresh search.
    pub async fn handle_curriculum_change(
        &self,
        curriculum: &CurriculumSelection,
    ) -> CoreResult<()> {
        if curriculum.subject.is_none() || curriculum.unit.is_none() {
            let err = CoreError::Validation(
                "교육과정 정보를 찾을 수 없습니다. 실험 설계안 탭에서 교육과정을 먼저 선택해주세요."
                    .to_string(),
            );
            self.record_err(&err);
            return Err(err);
        }

        let term = self.derive_search_term(curriculum).await;
        let query = format!("science {term} experiment education");
        tracing::info!(%query, "curriculum video search");
        self.state().base_query = Some(query.clone());
        self.perform_search(query).await
    }

    /// English search term for the first selected element: static table,
    /// then the translation call, then the original text. No selection maps
    /// to a generic science query.
    async fn derive_search_term(&self, curriculum: &CurriculumSelection) -> String {
        let Some(first) = curriculum.selected_elements.first() else {
            return "general science".to_string();
        };
        if let Some(term) = english_term(first) {
            return term.to_string();
        }
        match self.relay.translate(first, "영어").await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => first.clone(),
            Err(err) => {
                tracing::warn!(element = %first, %err, "translation failed; using original term");
                first.clone()
            }
        }
    }

    /// Search with the user's filter text on top of the curriculum base
    /// query. Empty input repeats the base query alone.
    pub async fn handle_search(&self, user_query: &str) -> CoreResult<()> {
        let base = self.state().base_query.clone();
        let Some(base) = base else {
            let err = CoreError::Validation(
                "교육과정 기반 검색어가 설정되지 않았습니다. 잠시 후 다시 시도해주세요.".to_string(),
            );
            self.record_err(&err);
            return Err(err);
        };
        let user_query = user_query.trim();
        let query = if user_query.is_empty() {
            base
        } else {
            format!("{base} {user_query}")
        };
        self.perform_search(query).await
    }

    /// A suggestion-tag click is a filter search.
    pub async fn apply_filter(&self, filter: &str) -> CoreResult<()> {
        self.handle_search(filter).await
    }

    pub fn filter_suggestions(&self) -> FilterSuggestions {
        let mut korean: Vec<String> = KOREAN_FILTERS.iter().map(|f| f.to_string()).collect();
        korean.extend(self.store.curriculum().selected_elements);
        FilterSuggestions {
            korean,
            english: ENGLISH_FILTERS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Start a fresh search: reset pagination and replace stored results.
    pub async fn perform_search(&self, query: String) -> CoreResult<()> {
        {
            let mut state = self.state();
            if state.is_loading {
                return Ok(());
            }
            state.current_query = Some(query);
            state.next_page_token = None;
            state.has_more = true;
            state.replace_results = true;
        }
        self.load_videos().await
    }

    /// Visibility-triggered loader: debounce, then load the next page. A new
    /// trigger supersedes a pending one.
    pub fn on_scroll_trigger(self: Arc<Self>) {
        {
            let state = self.state();
            if state.is_loading || !state.has_more || state.current_query.is_none() {
                return;
            }
        }
        let tab = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(SCROLL_DEBOUNCE).await;
            if let Err(err) = tab.load_more().await {
                tracing::error!(%err, "scroll-triggered video load failed");
            }
        });
        if let Ok(mut slot) = self.debounce.lock() {
            if let Some(previous) = slot.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Load the next page of the current query. No-op while a fetch is
    /// pending or when the result set is exhausted.
    pub async fn load_more(&self) -> CoreResult<()> {
        {
            let state = self.state();
            if state.is_loading || !state.has_more || state.current_query.is_none() {
                return Ok(());
            }
        }
        self.load_videos().await
    }

    async fn load_videos(&self) -> CoreResult<()> {
        let (query, token, replace) = {
            let mut state = self.state();
            if state.is_loading {
                return Ok(());
            }
            let Some(query) = state.current_query.clone() else {
                return Ok(());
            };
            state.is_loading = true;
            let token = state.next_page_token.clone();
            let replace = state.replace_results;
            state.replace_results = false;
            (query, token, replace)
        };

        let _pending = FetchFlag(self);
        let result = self.fetch_page(&query, token.as_deref(), replace).await;
        match &result {
            Ok(()) => {
                if let Ok(mut slot) = self.last_error.lock() {
                    *slot = None;
                }
            }
            Err(err) => self.record_err(err),
        }
        result
    }

    async fn fetch_page(&self, query: &str, token: Option<&str>, replace: bool) -> CoreResult<()> {
        let page = self
            .relay
            .search_videos(query, token, VIDEOS_PER_PAGE)
            .await?;

        let mut videos = Vec::with_capacity(page.hits.len());
        for hit in &page.hits {
            let details = match self.relay.video_details(&hit.video_id).await {
                Ok(details) => details,
                Err(err) => {
                    tracing::debug!(video = %hit.video_id, %err, "detail fetch failed; using fallback");
                    VideoDetails::default()
                }
            };
            videos.push(Video {
                id: hit.video_id.clone(),
                title: hit.title.clone(),
                channel: hit.channel.clone(),
                thumbnail_url: hit.thumbnail_url.clone(),
                duration: details.duration,
                view_count: details.view_count,
                published_at: hit.published_at,
            });
        }

        {
            let mut state = self.state();
            state.next_page_token = page.next_page_token;
            state.has_more = state.next_page_token.is_some();
        }
        self.store.set_videos(videos, !replace);
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn has_more(&self) -> bool {
        self.state().has_more
    }

    pub fn base_query(&self) -> Option<String> {
        self.state().base_query.clone()
    }

    pub fn current_query(&self) -> Option<String> {
        self.state().current_query.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    fn record_err(&self, err: &CoreError) {
        tracing::error!(%err, "video search failed");
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(err.to_string());
        }
    }
}

impl TabController for VideoTab {
    fn kind(&self) -> TabKind {
        TabKind::Video
    }

    fn render(&self) -> Option<String> {
        None
    }

    fn on_deactivate(&self) {
        if let Ok(mut slot) = self.debounce.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern compiles")
});

/// `PT1H2M3S` → `1:02:03`, `PT4M13S` → `4:13`. Unparseable input renders as
/// zero length.
pub fn format_duration(duration: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(duration) else {
        return "0:00".to_string();
    };
    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (part(1), part(2), part(3));
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Abbreviate view counts: `1234567` → `1.2M`, `15300` → `1.5K`.
pub fn format_view_count(count: u64) -> String {
    fn tenths(value: u64) -> String {
        if value % 10 == 0 {
            format!("{}", value / 10)
        } else {
            format!("{}.{}", value / 10, value % 10)
        }
    }
    if count >= 1_000_000 {
        format!("{}M", tenths(count / 100_000))
    } else if count >= 1_000 {
        format!("{}K", tenths(count / 100))
    } else {
        count.to_string()
    }
}

/// Relative published date in Korean: `3일 전`, `2개월 전`, `1년 전`.
pub fn format_relative_date(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - published).num_seconds().abs();
    let days = (seconds + 86_399) / 86_400;
    if days < 30 {
        format!("{}일 전", days.max(1))
    } else if days < 365 {
        format!("{}개월 전", days / 30)
    } else {
        format!("{}년 전", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn durations_format_like_the_player() {
        assert_eq!(format_duration("PT4M13S"), "4:13");
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(format_duration("PT45S"), "0:45");
        assert_eq!(format_duration("PT0S"), "0:00");
        assert_eq!(format_duration("garbage"), "0:00");
    }

    #[test]
    fn view_counts_abbreviate() {
        assert_eq!(format_view_count(532), "532");
        assert_eq!(format_view_count(15_300), "15.3K");
        assert_eq!(format_view_count(2_000), "2K");
        assert_eq!(format_view_count(1_234_567), "1.2M");
        assert_eq!(format_view_count(2_000_000), "2M");
    }

    #[test]
    fn relative_dates_in_korean() {
        let now = Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap();
        let day_ago = Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap();
        let months_ago = Utc.with_ymd_and_hms(2026, 5, 5, 12, 0, 0).unwrap();
        let years_ago = Utc.with_ymd_and_hms(2023, 8, 5, 12, 0, 0).unwrap();

        assert_eq!(format_relative_date(day_ago, now), "1일 전");
        assert_eq!(format_relative_date(months_ago, now), "3개월 전");
        assert_eq!(format_relative_date(years_ago, now), "3년 전");
    }
}
