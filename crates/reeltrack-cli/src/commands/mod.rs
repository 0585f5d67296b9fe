pub mod add;
pub mod config;
pub mod delete;
pub mod list;
pub mod prompts;
pub mod status;

use crate::render::short_id;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use media_list_config::{Config, CredentialStore, PathManager};
use media_list_core::{CollectionManager, KeyValueItemStore};
use media_list_enrichment::{EnrichmentClient, GeminiClient, Unconfigured};
use media_list_models::MediaItem;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Paths and settings shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        Self::from_paths(PathManager::default(), data_dir)
    }

    fn from_paths(paths: PathManager, data_dir: Option<PathBuf>) -> Result<Self> {
        let config_file = paths.config_file();
        let mut config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid config in {}: {}", config_file.display(), e))?;

        if data_dir.is_some() {
            config.storage.data_dir = data_dir;
        }

        Ok(Self { paths, config })
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        let credentials_file = self.paths.credentials_file();
        let mut store = CredentialStore::new(credentials_file.clone());
        store
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
        Ok(store)
    }

    pub fn api_key(&self) -> Result<Option<String>> {
        Ok(self.credentials()?.resolve_enrichment_api_key())
    }

    fn enricher(&self) -> Result<Arc<dyn EnrichmentClient>> {
        match self.api_key()? {
            Some(key) => {
                let client = GeminiClient::from_config(&self.config.enrichment, key)
                    .wrap_err("Failed to set up the enrichment client")?;
                Ok(Arc::new(client))
            }
            None => {
                debug!("No API key configured, lookups are disabled");
                Ok(Arc::new(Unconfigured))
            }
        }
    }

    pub fn open_manager(&self) -> Result<CollectionManager> {
        let store = KeyValueItemStore::open(&self.config.storage, &self.paths);
        debug!("Collection file: {}", store.path().display());
        Ok(CollectionManager::new(store, self.enricher()?))
    }
}

/// Resolve a full id or a unique id prefix to an item id
pub fn resolve_id(items: &[MediaItem], input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(eyre!("Item id cannot be empty"));
    }
    if let Some(item) = items.iter().find(|item| item.id == input) {
        return Ok(item.id.clone());
    }

    let matches: Vec<&MediaItem> = items.iter().filter(|item| item.id.starts_with(input)).collect();
    match matches.as_slice() {
        [item] => Ok(item.id.clone()),
        [] => Err(eyre!("No item with id '{}'", input)),
        many => Err(eyre!(
            "Id '{}' is ambiguous, it matches {} items: {}",
            input,
            many.len(),
            many.iter()
                .map(|item| format!("{} ({})", short_id(&item.id), item.title))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}
