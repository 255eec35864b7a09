//! Video tab: curriculum-derived queries, paginated loading, and the
//! concurrent-fetch guards.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockRelay;
use sciplan_core::api::RelayApi;
use sciplan_core::store::AppStore;
use sciplan_core::tabs::VideoTab;
use sciplan_core::{CoreError, CurriculumSelection};

fn curriculum(elements: &[&str]) -> CurriculumSelection {
    CurriculumSelection {
        school_level: Some("고등학교".to_string()),
        grade_group: Some("10-12".to_string()),
        subject: Some("물리".to_string()),
        unit: Some("운동".to_string()),
        selected_elements: elements.iter().map(|e| e.to_string()).collect(),
    }
}

fn tab_with(relay: &Arc<MockRelay>) -> (Arc<AppStore>, Arc<VideoTab>) {
    let store = AppStore::shared();
    let tab = Arc::new(VideoTab::new(
        Arc::clone(&store),
        Arc::clone(relay) as Arc<dyn RelayApi>,
    ));
    (store, tab)
}

#[tokio::test]
async fn known_element_uses_the_static_translation_table() {
    let relay = MockRelay::new();
    let (_store, tab) = tab_with(&relay);

    tab.handle_curriculum_change(&curriculum(&["힘"])).await.unwrap();

    let (query, token, max_results) = relay.search_request(0);
    assert_eq!(query, "science force experiment education");
    assert_eq!(token, None);
    assert_eq!(max_results, 12);
    // no translation call was needed
    assert_eq!(relay.generate_count(), 0);
    assert_eq!(tab.base_query().as_deref(), Some("science force experiment education"));
}

#[tokio::test]
async fn unknown_element_falls_back_to_the_translation_call() {
    let relay = MockRelay::new();
    relay.push_generate(Ok("Brownian motion".to_string()));
    let (_store, tab) = tab_with(&relay);

    tab.handle_curriculum_change(&curriculum(&["브라운 운동"]))
        .await
        .unwrap();

    assert_eq!(relay.generate_count(), 1);
    assert!(relay.generate_prompt(0).contains("브라운 운동"));
    let (query, _, _) = relay.search_request(0);
    assert_eq!(query, "science Brownian motion experiment education");
}

#[tokio::test]
async fn failed_translation_keeps_the_original_term() {
    let relay = MockRelay::new();
    relay.push_generate(Err(CoreError::Relay("translator down".to_string())));
    let (_store, tab) = tab_with(&relay);

    tab.handle_curriculum_change(&curriculum(&["브라운 운동"]))
        .await
        .unwrap();

    let (query, _, _) = relay.search_request(0);
    assert_eq!(query, "science 브라운 운동 experiment education");
}

#[tokio::test]
async fn no_selected_elements_searches_general_science() {
    let relay = MockRelay::new();
    let (_store, tab) = tab_with(&relay);

    tab.handle_curriculum_change(&curriculum(&[])).await.unwrap();

    let (query, _, _) = relay.search_request(0);
    assert_eq!(query, "science general science experiment education");
}

#[tokio::test]
async fn incomplete_curriculum_is_rejected_without_searching() {
    let relay = MockRelay::new();
    let (_store, tab) = tab_with(&relay);

    let mut partial = curriculum(&["힘"]);
    partial.unit = None;
    let result = tab.handle_curriculum_change(&partial).await;

    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert_eq!(relay.search_count(), 0);
    assert!(tab.last_error().is_some());
}

#[tokio::test]
async fn pagination_follows_the_continuation_token_and_stops_at_the_end() {
    let relay = MockRelay::new();
    relay.push_search_page(MockRelay::page(&["a", "b"], Some("tok2")));
    relay.push_search_page(MockRelay::page(&["c"], None));
    let (store, tab) = tab_with(&relay);

    tab.perform_search("science force experiment education".to_string())
        .await
        .unwrap();
    let ids: Vec<_> = store.videos().into_iter().map(|v| v.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(tab.has_more());

    tab.load_more().await.unwrap();
    let ids: Vec<_> = store.videos().into_iter().map(|v| v.id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(!tab.has_more());
    let (_, token, _) = relay.search_request(1);
    assert_eq!(token.as_deref(), Some("tok2"));

    // no further pages: the loader issues no new fetch
    tab.load_more().await.unwrap();
    assert_eq!(relay.search_count(), 2);
}

#[tokio::test]
async fn videos_are_enriched_with_details() {
    let relay = MockRelay::new();
    relay.push_search_page(MockRelay::page(&["a", "b"], None));
    let (store, tab) = tab_with(&relay);

    tab.perform_search("science light experiment education".to_string())
        .await
        .unwrap();

    assert_eq!(relay.details_count(), 2);
    let videos = store.videos();
    assert_eq!(videos[0].duration, "PT4M13S");
    assert_eq!(videos[0].view_count, 15_300);
    assert_eq!(videos[0].channel, "과학 채널");
}

#[tokio::test]
async fn detail_failure_degrades_to_zero_values() {
    let relay = MockRelay::new();
    relay.fail_details();
    relay.push_search_page(MockRelay::page(&["x"], None));
    let (store, tab) = tab_with(&relay);

    tab.perform_search("science sound experiment education".to_string())
        .await
        .unwrap();

    let videos = store.videos();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].duration, "PT0S");
    assert_eq!(videos[0].view_count, 0);
    assert!(tab.last_error().is_none());
}

#[tokio::test]
async fn no_second_fetch_while_one_is_pending() {
    let relay = MockRelay::new();
    let gate = relay.hold_search();
    relay.push_search_page(MockRelay::page(&["a"], Some("tok")));
    let (_store, tab) = tab_with(&relay);

    let pending = tokio::spawn({
        let tab = Arc::clone(&tab);
        async move {
            tab.perform_search("science force experiment education".to_string())
                .await
        }
    });

    // wait for the fetch to be in flight
    while relay.search_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(tab.is_loading());

    // both loader entry points are guarded while the fetch is pending
    tab.load_more().await.unwrap();
    tab.perform_search("science force experiment education".to_string())
        .await
        .unwrap();
    assert_eq!(relay.search_count(), 1);

    gate.notify_one();
    pending.await.unwrap().unwrap();
    assert_eq!(relay.search_count(), 1);
    assert!(!tab.is_loading());
}

#[tokio::test(start_paused = true)]
async fn scroll_trigger_debounces_before_loading_more() {
    let relay = MockRelay::new();
    relay.push_search_page(MockRelay::page(&["a"], Some("tok2")));
    relay.push_search_page(MockRelay::page(&["b"], None));
    let (_store, tab) = tab_with(&relay);

    tab.perform_search("science force experiment education".to_string())
        .await
        .unwrap();
    assert_eq!(relay.search_count(), 1);

    // a second trigger supersedes the first; only one load fires
    Arc::clone(&tab).on_scroll_trigger();
    Arc::clone(&tab).on_scroll_trigger();

    for _ in 0..50 {
        if relay.search_count() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(relay.search_count(), 2);
}

#[tokio::test]
async fn filter_search_requires_an_established_base_query() {
    let relay = MockRelay::new();
    let (_store, tab) = tab_with(&relay);

    let result = tab.handle_search("chemistry").await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert_eq!(relay.search_count(), 0);

    tab.handle_curriculum_change(&curriculum(&["힘"])).await.unwrap();
    tab.apply_filter("chemistry").await.unwrap();
    let (query, _, _) = relay.search_request(1);
    assert_eq!(query, "science force experiment education chemistry");

    // empty input repeats the curriculum base query
    tab.handle_search("  ").await.unwrap();
    let (query, _, _) = relay.search_request(2);
    assert_eq!(query, "science force experiment education");
}

#[tokio::test]
async fn filter_suggestions_include_selected_elements() {
    let relay = MockRelay::new();
    let (store, tab) = tab_with(&relay);
    store.set_curriculum(curriculum(&["힘", "가속도"]));

    let suggestions = tab.filter_suggestions();
    assert!(suggestions.korean.contains(&"화학".to_string()));
    assert!(suggestions.korean.contains(&"힘".to_string()));
    assert!(suggestions.korean.contains(&"가속도".to_string()));
    assert!(suggestions.english.contains(&"laboratory".to_string()));
}
