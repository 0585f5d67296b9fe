use media_list_models::{lenient_u32, MediaDetails, MediaFormat, MediaKind, PLATFORM_NOT_AVAILABLE};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::EnrichmentError;

/// Reply shape as the model tends to produce it. Every field is optional here;
/// required ones are checked in `into_details`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetails {
    title: Option<String>,
    year: Option<Value>,
    description: Option<String>,
    #[serde(alias = "type", alias = "mediaType", alias = "media_type")]
    kind: Option<String>,
    platform: Option<String>,
    duration: Option<Value>,
    seasons: Option<Value>,
    #[serde(alias = "episodes_per_season")]
    episodes_per_season: Option<Vec<Value>>,
    #[serde(alias = "poster_url")]
    poster_url: Option<String>,
}

/// Parse a free-form service reply into media details.
///
/// The reply may be wrapped in prose or code fences; the first balanced
/// `{...}` span is used.
pub fn parse_details(text: &str) -> Result<MediaDetails, EnrichmentError> {
    let json = extract_json_object(text).ok_or(EnrichmentError::NoJsonObject)?;
    debug!("Extracted {} bytes of JSON from enrichment reply", json.len());

    let raw: RawDetails = serde_json::from_str(json)?;
    raw.into_details()
}

/// Find the first balanced `{...}` span, ignoring braces inside JSON strings
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|(_, ch)| *ch == '{')
        .find_map(|(start, _)| balanced_span_from(text, start))
}

fn balanced_span_from(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

impl RawDetails {
    fn into_details(self) -> Result<MediaDetails, EnrichmentError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(EnrichmentError::MissingField("title"))?;
        let year = self
            .year
            .as_ref()
            .and_then(lenient_u32)
            .ok_or(EnrichmentError::MissingField("year"))?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .ok_or(EnrichmentError::MissingField("description"))?;

        let platform = self
            .platform
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PLATFORM_NOT_AVAILABLE.to_string());

        let kind = MediaKind::normalize(self.kind.as_deref().unwrap_or_default());
        let episodes_per_season: Vec<u32> = self
            .episodes_per_season
            .unwrap_or_default()
            .iter()
            .filter_map(lenient_u32)
            .collect();
        let seasons = self.seasons.as_ref().and_then(lenient_u32).or_else(|| {
            (!episodes_per_season.is_empty()).then_some(episodes_per_season.len() as u32)
        });
        let duration = self.duration.as_ref().and_then(lenient_u32);

        let poster_url = self
            .poster_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(MediaDetails {
            title,
            year,
            description,
            platform,
            poster_url,
            format: MediaFormat::from_parts(kind, duration, seasons, episodes_per_season),
        })
    }
}
