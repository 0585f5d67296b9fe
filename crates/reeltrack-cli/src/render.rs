use comfy_table::{Attribute, Cell, Color, Table};
use media_list_core::DerivedView;
use media_list_models::{format_duration, watch_search_url, MediaFormat, MediaItem, WatchStatus};
use owo_colors::OwoColorize;

const SHORT_ID_LEN: usize = 8;

/// Leading part of an id, enough to address it from the command line
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn tab_heading(view: &DerivedView, tab: WatchStatus) -> String {
    let text = format!("{} ({})", tab.label(), view.count(tab));
    if tab == view.tab {
        text.bold().bright_cyan().to_string()
    } else {
        text.bright_black().to_string()
    }
}

/// Kind-specific one-liner: runtime for movies, season count for series
pub fn format_summary(format: &MediaFormat) -> String {
    match format {
        MediaFormat::Movie { duration } => duration.map(format_duration).unwrap_or_default(),
        MediaFormat::Series { seasons: Some(1), .. } => "1 season".to_string(),
        MediaFormat::Series { seasons: Some(n), .. } => format!("{} seasons", n),
        MediaFormat::Series { seasons: None, .. } => String::new(),
    }
}

pub fn view_table(view: &DerivedView) -> String {
    let mut out = format!(
        "{}  {}\n",
        tab_heading(view, WatchStatus::Watchlist),
        tab_heading(view, WatchStatus::Watched)
    );

    if view.items.is_empty() {
        let empty = if view.is_filtered() {
            format!("No titles match '{}'.", view.filter)
        } else if view.tab == WatchStatus::Watchlist {
            "Your watchlist is empty. Add something with `reeltrack add <title>`.".to_string()
        } else {
            "Nothing watched yet.".to_string()
        };
        out.push_str(&empty.bright_black().to_string());
        return out;
    }

    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Length").add_attribute(Attribute::Bold),
        Cell::new("Platform").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
    ]);

    for item in &view.items {
        let platform = if item.is_platform_available() {
            Cell::new(&item.platform)
        } else {
            Cell::new(&item.platform).fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(short_id(&item.id)).fg(Color::DarkGrey),
            Cell::new(&item.title),
            Cell::new(item.year),
            Cell::new(item.kind().label()),
            Cell::new(format_summary(&item.format)),
            platform,
            Cell::new(item.user_rating.map(|r| r.stars()).unwrap_or_default()).fg(Color::Yellow),
        ]);
    }

    out.push_str(&table.to_string());
    out
}

pub fn item_card(item: &MediaItem) -> String {
    let mut table = styled_table();
    table.set_header(vec![Cell::new(format!("{} ({})", item.title, item.year))
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)]);

    table.add_row(vec![Cell::new("ID"), Cell::new(&item.id)]);
    table.add_row(vec![Cell::new("Type"), Cell::new(item.kind().label())]);
    table.add_row(vec![Cell::new("Status"), Cell::new(item.status.label())]);
    table.add_row(vec![
        Cell::new("Rating"),
        Cell::new(
            item.user_rating
                .map(|r| format!("{} ({})", r.stars(), r))
                .unwrap_or_else(|| "Not rated".to_string()),
        ),
    ]);
    table.add_row(vec![Cell::new("Platform"), Cell::new(&item.platform)]);

    match &item.format {
        MediaFormat::Movie { duration: Some(minutes) } => {
            table.add_row(vec![Cell::new("Duration"), Cell::new(format_duration(*minutes))]);
        }
        MediaFormat::Movie { duration: None } => {}
        MediaFormat::Series {
            seasons,
            episodes_per_season,
        } => {
            if let Some(seasons) = seasons {
                table.add_row(vec![Cell::new("Seasons"), Cell::new(seasons)]);
            }
            for (index, episodes) in episodes_per_season.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(format!("  Season {}", index + 1)),
                    Cell::new(format!("{} episodes", episodes)),
                ]);
            }
        }
    }

    if !item.description.is_empty() {
        table.add_row(vec![Cell::new("About"), Cell::new(&item.description)]);
    }
    table.add_row(vec![Cell::new("Poster"), Cell::new(&item.poster_url)]);
    if item.is_platform_available() {
        table.add_row(vec![
            Cell::new("Where to watch"),
            Cell::new(watch_search_url(&item.title, &item.platform)),
        ]);
    }

    table.to_string()
}
