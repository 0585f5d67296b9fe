pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, EnrichmentConfig, LoggingConfig, StorageConfig, DEFAULT_STORAGE_KEY};
pub use credentials::{CredentialStore, API_KEY_ENV};
pub use paths::PathManager;
