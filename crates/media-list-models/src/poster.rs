/// Deterministic placeholder poster for a (title, year) pair.
///
/// Used when the enrichment service supplies no poster and when legacy
/// records are loaded without one.
pub fn fallback_poster_url(title: &str, year: u32) -> String {
    format!(
        "https://image.pollinations.ai/prompt/movie%20poster%20key%20art%20for%20{}%20{}%20vertical%20high%20quality?width=400&height=600&nologo=true",
        urlencoding::encode(title),
        year
    )
}
