pub mod display;
pub mod lenient;
pub mod media;
pub mod poster;
pub mod rating;
pub mod status;

pub use display::{format_duration, watch_search_url};
pub use lenient::lenient_u32;
pub use media::{MediaDetails, MediaFormat, MediaItem, MediaKind, PLATFORM_NOT_AVAILABLE};
pub use poster::fallback_poster_url;
pub use rating::UserRating;
pub use status::WatchStatus;
