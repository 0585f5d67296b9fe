pub mod backend;
pub mod error;
pub mod manager;
pub mod notice;
pub mod store;
pub mod view;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{CollectionError, StoreError};
pub use manager::{AddOutcome, CollectionManager};
pub use notice::{Notice, NoticeLevel};
pub use store::{ItemStore, KeyValueItemStore};
pub use view::{derive_view, matches_filter, DerivedView};
