/// Render a runtime in minutes as "2h 28m", "45m" or "2h". Zero renders empty.
pub fn format_duration(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, 0) => String::new(),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Web search for where to stream a title on a given platform
pub fn watch_search_url(title: &str, platform: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(&format!("watch {} on {}", title, platform))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(148), "2h 28m");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(0), "");
    }

    #[test]
    fn test_watch_search_url() {
        assert_eq!(
            watch_search_url("Dark", "Netflix"),
            "https://www.google.com/search?q=watch%20Dark%20on%20Netflix"
        );
    }
}
