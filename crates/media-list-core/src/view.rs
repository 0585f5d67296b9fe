use media_list_models::{MediaItem, WatchStatus};
use serde::Serialize;

/// What the presentation layer renders: one tab, optionally filtered, plus
/// per-tab counts over the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    pub tab: WatchStatus,
    pub filter: String,
    pub items: Vec<MediaItem>,
    pub watchlist_count: usize,
    pub watched_count: usize,
}

impl DerivedView {
    pub fn count(&self, status: WatchStatus) -> usize {
        match status {
            WatchStatus::Watchlist => self.watchlist_count,
            WatchStatus::Watched => self.watched_count,
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }
}

/// Case-insensitive match against title, year or platform. A blank filter matches everything.
pub fn matches_filter(item: &MediaItem, filter: &str) -> bool {
    let filter = filter.trim().to_lowercase();
    if filter.is_empty() {
        return true;
    }

    item.title.to_lowercase().contains(&filter)
        || item.year.to_string().contains(&filter)
        || item.platform.to_lowercase().contains(&filter)
}

/// Items of one tab in collection order, narrowed by `filter`
pub fn derive_view(items: &[MediaItem], tab: WatchStatus, filter: &str) -> DerivedView {
    let visible = items
        .iter()
        .filter(|item| item.status == tab && matches_filter(item, filter))
        .cloned()
        .collect();

    let watched_count = items.iter().filter(|item| item.status == WatchStatus::Watched).count();

    DerivedView {
        tab,
        filter: filter.trim().to_string(),
        items: visible,
        watchlist_count: items.len() - watched_count,
        watched_count,
    }
}
