use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use media_list_core::AddOutcome;
use media_list_config::API_KEY_ENV;
use std::time::Duration;

fn lookup_spinner(query: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Looking up \"{}\"...", query));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn run_add(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    tracing::debug!("Add command started for {:?}", query);

    if ctx.api_key()?.is_none() {
        return Err(eyre!(
            "No API key configured. Run `reeltrack config set-key` or set {}.",
            API_KEY_ENV
        ));
    }

    let manager = ctx.open_manager()?;

    let spinner = (output.is_human() && !output.is_quiet()).then(|| lookup_spinner(query));
    let outcome = manager.add_item(query).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let notice = manager.take_notice();
    match outcome {
        AddOutcome::Added(item) => {
            if let Some(notice) = &notice {
                output.notice(notice);
            }
            output.data(&item, render::item_card);
            Ok(())
        }
        AddOutcome::Duplicate { .. } | AddOutcome::Busy => {
            if let Some(notice) = &notice {
                output.notice(notice);
            }
            Ok(())
        }
        AddOutcome::Failed => Err(eyre!(notice
            .map(|n| n.message)
            .unwrap_or_else(|| "Lookup failed".to_string()))),
        AddOutcome::EmptyQuery => Err(eyre!("Nothing to look up: the query is empty")),
    }
}
