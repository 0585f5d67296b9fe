use media_list_models::{
    lenient_u32, MediaFormat, MediaItem, MediaKind, UserRating, WatchStatus,
    PLATFORM_NOT_AVAILABLE,
};
use serde::Deserialize;
use serde_json::Value;
use media_list_config::{PathManager, StorageConfig};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::backend::{FileBackend, StorageBackend};
use crate::error::StoreError;

/// Durable home of the whole collection, loaded once and saved whole
pub trait ItemStore: Send + Sync {
    /// Never fails: a missing or unreadable collection loads as empty.
    fn load(&self) -> Vec<MediaItem>;

    /// Full snapshot write
    fn save(&self, items: &[MediaItem]) -> Result<(), StoreError>;
}

/// Stored record as read back from disk. Older records may lack fields or
/// carry labels from before the current enums, so everything is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMediaItem {
    id: Option<String>,
    title: Option<String>,
    year: Option<Value>,
    description: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    platform: Option<String>,
    poster_url: Option<String>,
    status: Option<String>,
    user_rating: Option<Value>,
    duration: Option<Value>,
    seasons: Option<Value>,
    episodes_per_season: Option<Vec<Value>>,
}

impl StoredMediaItem {
    /// Convert to a domain item. The flag reports whether the poster was backfilled.
    fn into_item(self) -> Option<(MediaItem, bool)> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        let year = self.year.as_ref().and_then(lenient_u32).unwrap_or_default();

        let kind = MediaKind::normalize(self.kind.as_deref().unwrap_or_default());
        let episodes_per_season = self
            .episodes_per_season
            .unwrap_or_default()
            .iter()
            .filter_map(lenient_u32)
            .collect();
        let format = MediaFormat::from_parts(
            kind,
            self.duration.as_ref().and_then(lenient_u32),
            self.seasons.as_ref().and_then(lenient_u32),
            episodes_per_season,
        );

        let mut item = MediaItem {
            id,
            year,
            description: self.description.unwrap_or_default(),
            platform: self
                .platform
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| PLATFORM_NOT_AVAILABLE.to_string()),
            poster_url: self.poster_url.unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .and_then(WatchStatus::parse)
                .unwrap_or_default(),
            user_rating: self
                .user_rating
                .as_ref()
                .and_then(lenient_u32)
                .and_then(|r| u8::try_from(r).ok())
                .and_then(UserRating::new),
            format,
            title,
        };

        let backfilled = item.backfill_poster();
        Some((item, backfilled))
    }
}

/// Item store over a key-value backend, holding the collection under one key
pub struct KeyValueItemStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> KeyValueItemStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read_records(&self) -> Option<Vec<Value>> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored collection under '{}', starting empty", self.key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read stored collection '{}': {}. Starting empty.", self.key, e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Stored collection '{}' is unparsable: {}. Starting empty.", self.key, e);
                None
            }
        }
    }
}

impl KeyValueItemStore<FileBackend> {
    /// File-backed store in the configured data directory, or the platform one
    pub fn open(storage: &StorageConfig, paths: &PathManager) -> Self {
        let dir = storage
            .data_dir
            .clone()
            .unwrap_or_else(|| paths.data_dir().to_path_buf());
        debug!("Opening collection '{}' in {:?}", storage.key, dir);
        Self::new(FileBackend::new(dir), storage.key.clone())
    }

    pub fn path(&self) -> PathBuf {
        self.backend.path_for(&self.key)
    }
}

impl<B: StorageBackend> ItemStore for KeyValueItemStore<B> {
    fn load(&self) -> Vec<MediaItem> {
        let Some(records) = self.read_records() else {
            return Vec::new();
        };

        let mut items = Vec::with_capacity(records.len());
        let mut seen_ids = HashSet::new();
        let mut backfilled = 0;
        let mut skipped = 0;

        for (index, record) in records.into_iter().enumerate() {
            let converted = serde_json::from_value::<StoredMediaItem>(record)
                .ok()
                .and_then(StoredMediaItem::into_item);
            let Some((item, poster_backfilled)) = converted else {
                warn!("Skipping stored record #{} in '{}': unreadable or missing id/title", index, self.key);
                skipped += 1;
                continue;
            };
            if !seen_ids.insert(item.id.clone()) {
                warn!("Skipping stored record #{} in '{}': duplicate id {}", index, self.key, item.id);
                skipped += 1;
                continue;
            }
            if poster_backfilled {
                backfilled += 1;
            }
            items.push(item);
        }

        // A write-back would drop the skipped records from disk for good
        if backfilled > 0 && skipped > 0 {
            warn!(
                "Backfilled posters for {} item(s) in '{}' but {} record(s) were unreadable, leaving the stored collection untouched",
                backfilled, self.key, skipped
            );
        } else if backfilled > 0 {
            info!("Backfilled posters for {} stored item(s), writing corrected collection", backfilled);
            if let Err(e) = self.save(&items) {
                warn!("Failed to write back migrated collection '{}': {}", self.key, e);
            }
        }

        info!("Loaded {} item(s) from '{}'", items.len(), self.key);
        items
    }

    fn save(&self, items: &[MediaItem]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items)?;
        self.backend.write(&self.key, &json)?;
        debug!("Saved {} item(s) to '{}'", items.len(), self.key);
        Ok(())
    }
}
