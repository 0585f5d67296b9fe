use clap::{ArgAction, Parser, Subcommand};
use commands::{add, config, delete, list, status};
use media_list_models::WatchStatus;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "reeltrack")]
#[command(about = "ReelTrack - Keep track of the movies and series you want to watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Store the collection in this directory instead of the configured one
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a title and add it to the watchlist
    #[command(long_about = "Look up a movie or series by free-text query, fill in its details with the configured enrichment service and add it to the top of the watchlist. Titles already in the collection are rejected.")]
    Add {
        /// Title or description, e.g. "inception" or "the dark knight 2008"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List the watchlist, or what you've already watched
    List {
        /// Show the watched tab instead of the watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,

        /// Only show items whose title, year or platform contains TEXT
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
    /// Show everything known about one item
    Show {
        /// Item id (a unique prefix is enough)
        id: String,
    },
    /// Move an item to the watched tab
    Watched {
        /// Item id (a unique prefix is enough)
        id: String,
    },
    /// Move an item back to the watchlist
    Unwatch {
        /// Item id (a unique prefix is enough)
        id: String,
    },
    /// Rate an item from 1 to 5 stars
    Rate {
        /// Item id (a unique prefix is enough)
        id: String,

        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Remove an item from the collection
    #[command(long_about = "Remove an item from the collection. Asks for confirmation unless --yes is given.")]
    Delete {
        /// Item id (a unique prefix is enough)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// View or change configuration and the API key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (the API key is masked)
    Show,

    /// Store the enrichment API key
    #[command(long_about = "Store the Gemini API key in the credentials file. Prompts for it when --key is not given. The GEMINI_API_KEY environment variable takes precedence over the stored key.")]
    SetKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },

    /// Change enrichment and logging settings
    Set {
        /// Model used for lookups, e.g. gemini-2.5-flash
        #[arg(long)]
        model: Option<String>,

        /// Request timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,

        /// Write logs to this file instead of stderr
        #[arg(long, value_name = "FILE")]
        log_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let ctx = commands::AppContext::load(cli.data_dir)?;

    logging::init_logging(
        cli.verbose,
        cli.quiet,
        &ctx.config.logging.level,
        ctx.config.logging.file.as_deref(),
    )
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Add { query } => add::run_add(&ctx, &query.join(" "), &output).await,
        Commands::List { watched, filter } => {
            let tab = if watched { WatchStatus::Watched } else { WatchStatus::Watchlist };
            list::run_list(&ctx, tab, filter.as_deref().unwrap_or_default(), &output)
        }
        Commands::Show { id } => list::run_show(&ctx, &id, &output),
        Commands::Watched { id } => status::run_set_status(&ctx, &id, WatchStatus::Watched, &output),
        Commands::Unwatch { id } => status::run_set_status(&ctx, &id, WatchStatus::Watchlist, &output),
        Commands::Rate { id, rating } => status::run_rate(&ctx, &id, rating, &output),
        Commands::Delete { id, yes } => delete::run_delete(&ctx, &id, yes, &output),
        Commands::Config { cmd } => config::run_config(cmd, &ctx, &output),
    }
}
