use super::{prompts, AppContext};
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use media_list_config::{Config, API_KEY_ENV};
use media_list_core::KeyValueItemStore;
use serde_json::json;
use std::path::PathBuf;

pub fn run_config(cmd: ConfigCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(ctx, output),
        ConfigCommands::SetKey { key } => set_key(key, ctx, output),
        ConfigCommands::Set {
            model,
            timeout,
            log_file,
        } => set_options(model, timeout, log_file, ctx, output),
    }
}

/// Where the effective API key comes from
fn key_source(ctx: &AppContext) -> Result<(&'static str, Option<String>)> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(("environment", Some(key)));
        }
    }
    let credentials = ctx.credentials()?;
    Ok(match credentials.get_enrichment_api_key() {
        Some(key) => ("credentials file", Some(key.clone())),
        None => ("not set", None),
    })
}

fn show_config(ctx: &AppContext, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let collection_file = KeyValueItemStore::open(&config.storage, &ctx.paths).path();
    let (source, key) = key_source(ctx)?;
    let masked_key = key.as_deref().map(mask_string).unwrap_or_else(|| "<not set>".to_string());
    let timeout = config
        .enrichment
        .request_timeout_secs
        .map(|secs| format!("{} seconds", secs))
        .unwrap_or_else(|| "none".to_string());
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());

    let summary = json!({
        "config_file": ctx.paths.config_file(),
        "enrichment": {
            "model": config.enrichment.model,
            "base_url": config.enrichment.base_url,
            "request_timeout_secs": config.enrichment.request_timeout_secs,
            "api_key": masked_key,
            "api_key_source": source,
        },
        "storage": {
            "key": config.storage.key,
            "collection_file": collection_file,
        },
        "logging": {
            "level": config.logging.level,
            "file": config.logging.file,
        },
    });

    output.data(&summary, |_| {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        table.set_header(vec![
            Cell::new("Configuration").fg(Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new(ctx.paths.config_file().display().to_string()),
        ]);
        table.add_row(vec![Cell::new("Model"), Cell::new(&config.enrichment.model)]);
        table.add_row(vec![Cell::new("Endpoint"), Cell::new(&config.enrichment.base_url)]);
        table.add_row(vec![Cell::new("Request timeout"), Cell::new(&timeout)]);
        table.add_row(vec![Cell::new("API key"), Cell::new(format!("{} ({})", masked_key, source))]);
        table.add_row(vec![Cell::new("Collection"), Cell::new(collection_file.display().to_string())]);
        table.add_row(vec![Cell::new("Log level"), Cell::new(&config.logging.level)]);
        table.add_row(vec![Cell::new("Log file"), Cell::new(&log_file)]);
        table.to_string()
    });

    Ok(())
}

fn set_key(key_arg: Option<String>, ctx: &AppContext, output: &Output) -> Result<()> {
    let key = match key_arg {
        Some(key) => key.trim().to_string(),
        None => prompts::prompt_secret("Gemini API key")?,
    };
    if key.is_empty() {
        return Err(eyre!("API key is required"));
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let credentials_file = ctx.paths.credentials_file();
    let mut credentials = ctx.credentials()?;
    credentials.set_enrichment_api_key(key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success("API key saved.");
    if std::env::var(API_KEY_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        output.warn(format!("{} is set and takes precedence over the stored key.", API_KEY_ENV));
    }
    Ok(())
}

fn set_options(
    model: Option<String>,
    timeout: Option<u64>,
    log_file: Option<PathBuf>,
    ctx: &AppContext,
    output: &Output,
) -> Result<()> {
    if model.is_none() && timeout.is_none() && log_file.is_none() {
        return Err(eyre!("Nothing to change. Pass --model, --timeout or --log-file."));
    }

    let config_file = ctx.paths.config_file();
    // Re-read the file so a --data-dir given on this run is not persisted
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    if let Some(model) = model {
        config.enrichment.model = model.trim().to_string();
    }
    if let Some(timeout) = timeout {
        config.enrichment.request_timeout_secs = Some(timeout);
    }
    if let Some(log_file) = log_file {
        config.logging.file = Some(log_file);
    }

    config
        .validate()
        .map_err(|e| eyre!("Invalid setting: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
