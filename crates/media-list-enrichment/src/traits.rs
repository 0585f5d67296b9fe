use async_trait::async_trait;
use media_list_models::MediaDetails;

use crate::error::EnrichmentError;

/// Resolves a free-text title query into structured media metadata
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    fn service_name(&self) -> &str;

    /// One attempt, no retries. `query` is expected to be non-empty.
    async fn fetch_details(&self, query: &str) -> Result<MediaDetails, EnrichmentError>;
}

/// Stand-in used when no API key is configured; every lookup fails with
/// `MissingCredential`.
pub struct Unconfigured;

#[async_trait]
impl EnrichmentClient for Unconfigured {
    fn service_name(&self) -> &str {
        "unconfigured"
    }

    async fn fetch_details(&self, _query: &str) -> Result<MediaDetails, EnrichmentError> {
        Err(EnrichmentError::MissingCredential)
    }
}
