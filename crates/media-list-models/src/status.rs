use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle tag of a tracked item. Both transitions are always legal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum WatchStatus {
    /// Still to watch
    #[default]
    #[serde(rename = "WATCHLIST")]
    Watchlist,
    /// Already seen
    #[serde(rename = "WATCHED")]
    Watched,
}

impl WatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            WatchStatus::Watchlist => "To watch",
            WatchStatus::Watched => "Watched",
        }
    }

    /// Parse a stored status label. Accepts the persisted form and plain names.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "watchlist" | "to watch" | "towatch" => Some(WatchStatus::Watchlist),
            "watched" => Some(WatchStatus::Watched),
            _ => None,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
