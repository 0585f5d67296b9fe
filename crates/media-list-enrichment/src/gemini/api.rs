use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

/// Grounds the answer in web search results (posters, current platform)
#[derive(Debug, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentRequest {
    pub fn for_query(query: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(query)),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if there is any text
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

// The search tool cannot be combined with a JSON response schema, so the
// output format is requested in the prompt.
pub fn build_prompt(query: &str) -> String {
    format!(
        r#"Act as a movie database API. Look up current, detailed information about: "{query}".

Return ONLY a valid JSON object (no markdown, no explanations) with these properties:
- title: the official title.
- year: release year (number).
- description: a short plot summary.
- type: "Movie" or "Series".
- platform: the main streaming platform (e.g. Netflix, HBO Max, Prime Video), or "Not available".
- duration: runtime in minutes (movies only).
- seasons: total number of seasons (series only).
- episodesPerSeason: array with the number of episodes in each season (series only).
- posterUrl: a direct URL to an official high-quality vertical poster image.

Make sure the JSON is valid."#
    )
}
