use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poster::fallback_poster_url;
use crate::rating::UserRating;
use crate::status::WatchStatus;

/// Sentinel platform value when no streaming service carries the title
pub const PLATFORM_NOT_AVAILABLE: &str = "Not available";

/// A tracked movie or series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub year: u32,
    pub description: String,
    pub platform: String,
    pub poster_url: String,
    pub status: WatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<UserRating>,
    #[serde(flatten)]
    pub format: MediaFormat,
}

/// Fixed two-value kind tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Series,
}

/// Kind-specific details. Serialized flat next to the item fields, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum MediaFormat {
    Movie {
        /// Runtime in minutes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
    },
    Series {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seasons: Option<u32>,
        /// Episode count per season, index = season number - 1
        #[serde(rename = "episodesPerSeason", default, skip_serializing_if = "Vec::is_empty")]
        episodes_per_season: Vec<u32>,
    },
}

/// Metadata resolved by the enrichment service for a free-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDetails {
    pub title: String,
    pub year: u32,
    pub description: String,
    pub platform: String,
    pub poster_url: Option<String>,
    pub format: MediaFormat,
}

impl MediaKind {
    /// Map a free-form kind label onto the two-value tag.
    ///
    /// Anything that is not recognizably a series falls back to `Movie`.
    pub fn normalize(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "series" | "serie" | "sèrie" | "tv show" | "tv series" | "tv" | "show" => {
                MediaKind::Series
            }
            _ => MediaKind::Movie,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "Series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl MediaFormat {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaFormat::Movie { .. } => MediaKind::Movie,
            MediaFormat::Series { .. } => MediaKind::Series,
        }
    }

    /// Build the variant for `kind`, keeping only the fields meaningful for it
    pub fn from_parts(
        kind: MediaKind,
        duration: Option<u32>,
        seasons: Option<u32>,
        episodes_per_season: Vec<u32>,
    ) -> Self {
        match kind {
            MediaKind::Movie => MediaFormat::Movie { duration },
            MediaKind::Series => MediaFormat::Series {
                seasons,
                episodes_per_season,
            },
        }
    }
}

impl MediaItem {
    /// Create a new watchlist entry from enrichment results.
    ///
    /// A missing or blank poster is replaced by the synthesized fallback.
    pub fn from_details(id: String, details: MediaDetails) -> Self {
        let poster_url = details
            .poster_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| fallback_poster_url(&details.title, details.year));

        Self {
            id,
            title: details.title,
            year: details.year,
            description: details.description,
            platform: details.platform,
            poster_url,
            status: WatchStatus::Watchlist,
            user_rating: None,
            format: details.format,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.format.kind()
    }

    /// Case-insensitive title comparison used for de-duplication
    pub fn has_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.trim().to_lowercase()
    }

    pub fn is_platform_available(&self) -> bool {
        let platform = self.platform.trim();
        !platform.is_empty() && !platform.eq_ignore_ascii_case(PLATFORM_NOT_AVAILABLE)
    }

    /// Fill in a synthesized poster when the stored one is blank.
    ///
    /// Returns true if the item was changed.
    pub fn backfill_poster(&mut self) -> bool {
        if self.poster_url.trim().is_empty() {
            self.poster_url = fallback_poster_url(&self.title, self.year);
            true
        } else {
            false
        }
    }
}
