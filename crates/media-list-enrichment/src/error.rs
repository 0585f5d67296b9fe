use thiserror::Error;

/// Everything that can go wrong resolving a query into media details.
///
/// Callers surface all of these to the user as one failure; the variants
/// exist for logging.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request to enrichment service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("enrichment service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("enrichment service returned no text")]
    EmptyResponse,

    #[error("no JSON object found in enrichment response")]
    NoJsonObject,

    #[error("malformed media details: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("media details missing required field '{0}'")]
    MissingField(&'static str),

    #[error("no API key configured for the enrichment service")]
    MissingCredential,
}
