use super::*;
use crate::backend::MemoryBackend;
use crate::notice::NoticeLevel;
use crate::store::KeyValueItemStore;
use async_trait::async_trait;
use media_list_enrichment::parse_details;
use media_list_models::{MediaFormat, MediaKind};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

const KEY: &str = "mediaWatchlist";

/// Replays canned replies in order; optionally waits on a gate before answering
struct ScriptedEnricher {
    replies: Mutex<VecDeque<Result<MediaDetails, EnrichmentError>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedEnricher {
    fn new(replies: Vec<Result<MediaDetails, EnrichmentError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    fn gated(replies: Vec<Result<MediaDetails, EnrichmentError>>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnrichmentClient for ScriptedEnricher {
    fn service_name(&self) -> &str {
        "scripted"
    }

    async fn fetch_details(&self, _query: &str) -> Result<MediaDetails, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(EnrichmentError::EmptyResponse))
    }
}

fn movie(title: &str, year: u32, platform: &str) -> MediaDetails {
    MediaDetails {
        title: title.to_string(),
        year,
        description: format!("About {}.", title),
        platform: platform.to_string(),
        poster_url: None,
        format: MediaFormat::Movie { duration: Some(120) },
    }
}

fn inception() -> MediaDetails {
    MediaDetails {
        format: MediaFormat::Movie { duration: Some(148) },
        ..movie("Inception", 2010, "Netflix")
    }
}

fn manager_with(
    replies: Vec<Result<MediaDetails, EnrichmentError>>,
) -> (CollectionManager, Arc<ScriptedEnricher>, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let enricher = ScriptedEnricher::new(replies);
    let manager = CollectionManager::new(
        KeyValueItemStore::new(Arc::clone(&backend), KEY),
        enricher.clone(),
    );
    (manager, enricher, backend)
}

fn stored_titles(backend: &MemoryBackend) -> Vec<String> {
    let stored: Vec<serde_json::Value> = serde_json::from_str(&backend.get(KEY).unwrap()).unwrap();
    stored.iter().map(|v| v["title"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn test_add_inception_then_reject_duplicate() {
    let (manager, enricher, _) = manager_with(vec![Ok(inception())]);

    let outcome = manager.add_item("Inception").await;
    let AddOutcome::Added(item) = outcome else {
        panic!("expected Added, got {:?}", outcome);
    };
    assert_eq!(manager.len(), 1);
    assert_eq!(item.status, WatchStatus::Watchlist);
    assert!(!item.poster_url.is_empty());
    assert_eq!(item.format, MediaFormat::Movie { duration: Some(148) });
    assert_eq!(manager.take_notice(), Some(Notice::success("Added: Inception")));

    let outcome = manager.add_item("inception").await;
    assert_eq!(outcome, AddOutcome::Duplicate { title: "Inception".to_string() });
    assert_eq!(manager.len(), 1);
    assert_eq!(enricher.calls(), 1);
    assert_eq!(
        manager.notice(),
        Some(Notice::info("\"Inception\" is already in your list."))
    );
    assert!(!manager.is_busy());
}

#[tokio::test]
async fn test_duplicate_detected_after_enrichment() {
    let (manager, enricher, _) = manager_with(vec![Ok(inception()), Ok(inception())]);

    manager.add_item("Inception").await;
    let outcome = manager.add_item("that dream heist movie with dicaprio").await;

    assert_eq!(outcome, AddOutcome::Duplicate { title: "Inception".to_string() });
    assert_eq!(enricher.calls(), 2);
    assert_eq!(manager.len(), 1);
}

#[tokio::test]
async fn test_titles_stay_unique_over_many_adds() {
    let replies = ["Heat", "HEAT", "Up", "Alien", "up", "Alien", "Heat"]
        .iter()
        .map(|title| Ok(movie(title, 2000, "Netflix")))
        .collect();
    let (manager, _, _) = manager_with(replies);

    for query in ["heat", "heat 1995", "up", "alien", "pixar up", "ALIEN", "the heat"] {
        manager.add_item(query).await;
    }

    let mut titles: Vec<String> = manager.items().iter().map(|i| i.title.to_lowercase()).collect();
    let before = titles.len();
    titles.sort();
    titles.dedup();
    assert_eq!(titles.len(), before);
    assert_eq!(before, 3);
}

#[tokio::test]
async fn test_newest_first_and_persisted() {
    let (manager, _, backend) = manager_with(vec![
        Ok(movie("Heat", 1995, "Max")),
        Ok(movie("Up", 2009, "Disney+")),
    ]);

    manager.add_item("Heat").await;
    manager.add_item("Up").await;

    let titles: Vec<String> = manager.items().into_iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Up", "Heat"]);
    assert_eq!(stored_titles(&backend), vec!["Up", "Heat"]);
}

#[tokio::test]
async fn test_tv_show_reply_stored_as_series() {
    let reply = r#"```json
{"title": "Severance", "year": 2022, "description": "Work-life balance.", "type": "TV Show", "platform": "Apple TV+", "seasons": 2, "episodesPerSeason": [9, 10]}
```"#;
    let (manager, _, _) = manager_with(vec![parse_details(reply)]);

    let AddOutcome::Added(item) = manager.add_item("Severance").await else {
        panic!("expected Added");
    };
    assert_eq!(item.kind(), MediaKind::Series);
    assert_eq!(manager.items()[0].kind(), MediaKind::Series);
}

#[tokio::test]
async fn test_enrichment_failure_leaves_collection_unchanged() {
    let (manager, _, backend) = manager_with(vec![
        Ok(movie("Heat", 1995, "Max")),
        Err(EnrichmentError::Status { code: 503, body: "overloaded".to_string() }),
        parse_details("I'm sorry, I can't help with that."),
    ]);
    manager.add_item("Heat").await;
    let before = manager.items();
    let stored_before = backend.get(KEY);

    for query in ["Interstellar", "Some unknown film"] {
        let outcome = manager.add_item(query).await;
        assert_eq!(outcome, AddOutcome::Failed);
        assert_eq!(manager.items(), before);
        assert_eq!(backend.get(KEY), stored_before);
        assert!(!manager.is_busy());

        let notice = manager.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }
}

#[tokio::test]
async fn test_empty_query_is_ignored() {
    let (manager, enricher, _) = manager_with(vec![]);
    assert_eq!(manager.add_item("   ").await, AddOutcome::EmptyQuery);
    assert_eq!(enricher.calls(), 0);
    assert_eq!(manager.notice(), None);
}

#[tokio::test]
async fn test_successful_add_clears_filter() {
    let (manager, _, _) = manager_with(vec![Ok(movie("Heat", 1995, "Max"))]);
    manager.set_filter("zzz");
    manager.add_item("Heat").await;
    assert_eq!(manager.filter(), "");
    assert_eq!(manager.current_view().items.len(), 1);
}

#[tokio::test]
async fn test_status_round_trip_restores_item() {
    let (manager, _, backend) = manager_with(vec![Ok(inception())]);
    let AddOutcome::Added(original) = manager.add_item("Inception").await else {
        panic!("expected Added");
    };

    assert!(manager.set_status(&original.id, WatchStatus::Watched));
    let watched = manager.get(&original.id).unwrap();
    assert_eq!(watched.status, WatchStatus::Watched);
    assert_eq!(MediaItem { status: WatchStatus::Watchlist, ..watched }, original);
    assert_eq!(manager.take_notice(), Some(Notice::success("Moved to: Watched")));

    assert!(manager.set_status(&original.id, WatchStatus::Watchlist));
    assert_eq!(manager.get(&original.id).unwrap(), original);

    let stored: Vec<serde_json::Value> = serde_json::from_str(&backend.get(KEY).unwrap()).unwrap();
    assert_eq!(stored[0]["status"], "WATCHLIST");
}

#[tokio::test]
async fn test_unknown_id_is_a_noop() {
    let (manager, _, _) = manager_with(vec![Ok(inception())]);
    manager.add_item("Inception").await;
    let before = manager.items();

    assert!(!manager.set_status("missing", WatchStatus::Watched));
    assert_eq!(manager.set_rating("missing", 3), Ok(false));
    assert!(!manager.request_delete("missing"));
    assert_eq!(manager.confirm_delete(), None);
    assert_eq!(manager.items(), before);
}

#[tokio::test]
async fn test_set_rating() {
    let (manager, _, backend) = manager_with(vec![Ok(inception())]);
    let AddOutcome::Added(item) = manager.add_item("Inception").await else {
        panic!("expected Added");
    };

    assert_eq!(manager.set_rating(&item.id, 0), Err(CollectionError::InvalidRating(0)));
    assert_eq!(manager.set_rating(&item.id, 6), Err(CollectionError::InvalidRating(6)));
    assert_eq!(manager.get(&item.id).unwrap().user_rating, None);

    assert_eq!(manager.set_rating(&item.id, 4), Ok(true));
    assert_eq!(manager.get(&item.id).unwrap().user_rating, UserRating::new(4));

    let stored: Vec<serde_json::Value> = serde_json::from_str(&backend.get(KEY).unwrap()).unwrap();
    assert_eq!(stored[0]["userRating"], 4);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (manager, _, backend) = manager_with(vec![
        Ok(movie("Heat", 1995, "Max")),
        Ok(movie("Up", 2009, "Disney+")),
    ]);
    manager.add_item("Heat").await;
    let AddOutcome::Added(up) = manager.add_item("Up").await else {
        panic!("expected Added");
    };
    manager.take_notice();

    assert!(manager.request_delete(&up.id));
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.pending_delete().map(|i| i.title), Some("Up".to_string()));
    assert_eq!(manager.notice(), None);

    let removed = manager.confirm_delete().unwrap();
    assert_eq!(removed.id, up.id);
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.pending_delete(), None);
    assert_eq!(manager.take_notice(), Some(Notice::success("Removed: Up")));
    assert_eq!(stored_titles(&backend), vec!["Heat"]);

    // nothing pending any more
    assert_eq!(manager.confirm_delete(), None);
    assert_eq!(manager.len(), 1);
}

#[tokio::test]
async fn test_cancel_delete() {
    let (manager, _, _) = manager_with(vec![Ok(movie("Heat", 1995, "Max"))]);
    let AddOutcome::Added(heat) = manager.add_item("Heat").await else {
        panic!("expected Added");
    };

    manager.request_delete(&heat.id);
    manager.cancel_delete();

    assert_eq!(manager.pending_delete(), None);
    assert_eq!(manager.confirm_delete(), None);
    assert_eq!(manager.len(), 1);
}

#[tokio::test]
async fn test_write_failure_keeps_in_memory_state() {
    let (manager, _, backend) = manager_with(vec![Ok(movie("Heat", 1995, "Max"))]);
    backend.set_fail_writes(true);

    let outcome = manager.add_item("Heat").await;
    assert!(matches!(outcome, AddOutcome::Added(_)));
    assert_eq!(manager.len(), 1);
    assert_eq!(backend.get(KEY), None);

    let id = manager.items()[0].id.clone();
    assert!(manager.set_status(&id, WatchStatus::Watched));
    assert_eq!(manager.get(&id).unwrap().status, WatchStatus::Watched);
}

#[tokio::test]
async fn test_loads_existing_collection() {
    let backend = Arc::new(MemoryBackend::with_entry(
        KEY,
        r#"[{"id":"a","title":"Heat","year":1995,"description":"","kind":"Movie","platform":"Max","posterUrl":"p","status":"WATCHED"}]"#,
    ));
    let manager = CollectionManager::new(
        KeyValueItemStore::new(Arc::clone(&backend), KEY),
        ScriptedEnricher::new(vec![]),
    );

    assert_eq!(manager.len(), 1);
    assert_eq!(manager.add_item("heat").await, AddOutcome::Duplicate { title: "Heat".to_string() });

    let view = manager.current_view();
    assert_eq!(view.tab, WatchStatus::Watchlist);
    assert!(view.items.is_empty());
    assert_eq!(view.watched_count, 1);

    manager.set_tab(WatchStatus::Watched);
    assert_eq!(manager.current_view().items.len(), 1);
}

#[tokio::test]
async fn test_second_add_rejected_while_busy() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(MemoryBackend::with_entry(
        KEY,
        r#"[{"id":"a","title":"Heat","year":1995,"posterUrl":"p"}]"#,
    ));
    let enricher = ScriptedEnricher::gated(vec![Ok(movie("Up", 2009, "Disney+"))], Arc::clone(&gate));
    let manager = CollectionManager::new(
        KeyValueItemStore::new(Arc::clone(&backend), KEY),
        enricher.clone(),
    );

    let handle = manager.spawn_add("Up");
    assert!(manager.is_busy());

    assert_eq!(manager.add_item("Alien").await, AddOutcome::Busy);
    assert_eq!(manager.take_notice(), Some(Notice::info(BUSY_MESSAGE)));

    // other operations keep working while the lookup is pending
    assert!(manager.set_status("a", WatchStatus::Watched));
    assert_eq!(manager.set_rating("a", 5), Ok(true));

    gate.notify_one();
    let outcome = handle.await.unwrap();
    assert!(matches!(outcome, Some(AddOutcome::Added(_))));
    assert!(!manager.is_busy());
    assert_eq!(enricher.calls(), 1);

    let heat = manager.get("a").unwrap();
    assert_eq!(heat.status, WatchStatus::Watched);
    assert_eq!(heat.user_rating, UserRating::new(5));
    assert_eq!(stored_titles(&backend), vec!["Up", "Heat"]);
}

#[tokio::test]
async fn test_abandoned_add_releases_busy_flag() {
    let gate = Arc::new(Notify::new());
    let enricher = ScriptedEnricher::gated(vec![Ok(movie("Alien", 1979, "Disney+"))], Arc::clone(&gate));
    let backend = Arc::new(MemoryBackend::new());
    let manager = CollectionManager::new(
        KeyValueItemStore::new(Arc::clone(&backend), KEY),
        enricher.clone(),
    );

    let abandoned = tokio::time::timeout(Duration::from_millis(20), manager.add_item("Up")).await;
    assert!(abandoned.is_err());
    assert!(!manager.is_busy());
    assert!(manager.is_empty());

    gate.notify_one();
    let outcome = manager.add_item("Alien").await;
    assert!(matches!(outcome, AddOutcome::Added(ref item) if item.title == "Alien"));
    assert_eq!(enricher.calls(), 2);
    assert_eq!(stored_titles(&backend), vec!["Alien"]);
}

#[tokio::test]
async fn test_result_for_closed_session_is_discarded() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(MemoryBackend::new());
    let enricher = ScriptedEnricher::gated(vec![Ok(movie("Up", 2009, "Disney+"))], Arc::clone(&gate));
    let manager = CollectionManager::new(
        KeyValueItemStore::new(Arc::clone(&backend), KEY),
        enricher,
    );

    let handle = manager.spawn_add("Up");
    drop(manager);
    gate.notify_one();

    assert_eq!(handle.await.unwrap(), None);
    assert_eq!(backend.get(KEY), None);
}

#[tokio::test]
async fn test_subscribers_see_each_change() {
    let (manager, _, _) = manager_with(vec![Ok(movie("Heat", 1995, "Max"))]);
    let mut changes = manager.subscribe();
    let start = *changes.borrow_and_update();

    manager.add_item("Heat").await;
    assert!(changes.has_changed().unwrap());
    let after_add = *changes.borrow_and_update();
    assert!(after_add > start);

    let id = manager.items()[0].id.clone();
    manager.request_delete(&id);
    manager.cancel_delete();
    assert!(*changes.borrow_and_update() > after_add);

    // a cancel with nothing pending changes nothing
    manager.cancel_delete();
    assert!(!changes.has_changed().unwrap());
}
