use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable that overrides the stored enrichment key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// On-disk layout of `credentials.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enrichment_api_key: Option<String>,
}

/// Secrets kept apart from `config.toml`
pub struct CredentialStore {
    path: PathBuf,
    credentials: Credentials,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: Credentials::default(),
        }
    }

    /// A missing file leaves the store empty
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            debug!("No credentials file at {:?}", self.path);
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)?;
        self.credentials = toml::from_str(&content)
            .with_context(|| format!("Malformed credentials file {:?}", self.path))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(&self.credentials)?)?;
        Ok(())
    }

    pub fn get_enrichment_api_key(&self) -> Option<&String> {
        self.credentials.enrichment_api_key.as_ref()
    }

    pub fn set_enrichment_api_key(&mut self, key: String) {
        self.credentials.enrichment_api_key = Some(key);
    }

    /// Stored key, unless the environment provides one
    pub fn resolve_enrichment_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.get_enrichment_api_key().cloned())
    }
}
