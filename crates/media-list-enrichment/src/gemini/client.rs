use async_trait::async_trait;
use media_list_config::EnrichmentConfig;
use media_list_models::MediaDetails;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::EnrichmentError;
use crate::gemini::api::{GenerateContentRequest, GenerateContentResponse};
use crate::parser::parse_details;
use crate::traits::EnrichmentClient;

/// Enrichment over the Gemini `generateContent` REST endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Arc<Client>,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_config(config: &EnrichmentConfig, api_key: String) -> Result<Self, EnrichmentError> {
        if api_key.trim().is_empty() {
            return Err(EnrichmentError::MissingCredential);
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: Arc::new(builder.build()?),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl EnrichmentClient for GeminiClient {
    fn service_name(&self) -> &str {
        "gemini"
    }

    async fn fetch_details(&self, query: &str) -> Result<MediaDetails, EnrichmentError> {
        let request = GenerateContentRequest::for_query(query);
        debug!("Requesting details for {:?} from {}", query, self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body.text().ok_or(EnrichmentError::EmptyResponse)?;
        debug!("Enrichment reply for {:?}: {}", query, text);

        let details = parse_details(&text)?;
        info!("Resolved {:?} to {} ({})", query, details.title, details.year);
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let result = GeminiClient::from_config(&EnrichmentConfig::default(), "  ".to_string());
        assert!(matches!(result, Err(EnrichmentError::MissingCredential)));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = EnrichmentConfig {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://example.test/v1beta/".to_string(),
            request_timeout_secs: Some(5),
        };
        let client = GeminiClient::from_config(&config, "key".to_string()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.service_name(), "gemini");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = EnrichmentConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: Some(2),
            ..EnrichmentConfig::default()
        };
        let client = GeminiClient::from_config(&config, "key".to_string()).unwrap();
        let result = client.fetch_details("Inception").await;
        assert!(matches!(result, Err(EnrichmentError::Transport(_))));
    }
}
