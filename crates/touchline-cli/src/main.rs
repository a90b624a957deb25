use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use touchline_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "touchline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root of the JSON data directory (default: ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Capture raw data from the fixtures provider with a headless browser
    Crawl {
        #[command(subcommand)]
        target: CrawlTarget,
    },
    /// Build the canonical club and fixture files from crawled data
    ///
    /// Clubs must be synced before fixtures: fixture sync resolves every
    /// team name against the canonical club list and skips fixtures whose
    /// clubs cannot be found.
    Sync {
        #[command(subcommand)]
        target: SyncTarget,
    },
    /// Show what has been crawled and synced
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum CrawlTarget {
    /// Capture the provider's club list
    Clubs {
        /// Page to load instead of the configured fixtures page
        #[arg(long)]
        url: Option<String>,

        /// Show the browser window
        #[arg(long)]
        show_browser: bool,
    },
    /// Capture every fixture page for one team
    ///
    /// Applies the season, competition and league filters in that order,
    /// then clicks "Load more" until the list is exhausted. Each captured
    /// API page is written to data/external/fixtures/<team>/chunk-<n>.json,
    /// replacing any earlier crawl of the same team.
    Fixtures {
        /// Local team slug; names the output directory
        #[arg(long)]
        team: String,

        /// League label exactly as the provider's filter shows it
        #[arg(long)]
        league: String,

        /// Season year (default: current year)
        #[arg(long)]
        season: Option<i32>,

        /// Competition label (default: from config)
        #[arg(long)]
        competition: Option<String>,

        /// Show the browser window
        #[arg(long)]
        show_browser: bool,
    },
}

#[derive(Debug, clap::Subcommand)]
enum SyncTarget {
    /// Merge the crawled club list into data/clubs/clubs.json
    Clubs,
    /// Transform crawled fixtures into data/matches/<team>.json
    Fixtures {
        /// Team slug to sync
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        team: Option<String>,

        /// Sync every crawled team
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Create the config file with defaults
    Init,
    /// Print an example config file
    Example,
}

fn load_config(data_dir: Option<PathBuf>) -> Result<Config> {
    match data_dir {
        Some(dir) => Config::load_with_data_dir(dir),
        None => Config::load(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl { target } => {
            let mut config = load_config(cli.data_dir)?;
            match target {
                CrawlTarget::Clubs { url, show_browser } => {
                    config.headless &= !show_browser;
                    commands::crawl::run_crawl_clubs(&config, url.as_deref())?;
                }
                CrawlTarget::Fixtures {
                    team,
                    league,
                    season,
                    competition,
                    show_browser,
                } => {
                    config.headless &= !show_browser;
                    commands::crawl::run_crawl_fixtures(&config, team, league, season, competition)?;
                }
            }
        }
        Commands::Sync { target } => {
            let config = load_config(cli.data_dir)?;
            match target {
                SyncTarget::Clubs => commands::sync::run_sync_clubs(&config)?,
                SyncTarget::Fixtures { team, all } => {
                    if all {
                        commands::sync::run_sync_all_fixtures(&config)?;
                    } else if let Some(team) = team {
                        commands::sync::run_sync_fixtures(&config, &team)?;
                    }
                }
            }
        }
        Commands::Status => {
            let config = load_config(cli.data_dir)?;
            commands::status::show_status(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(cli.data_dir)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Example => commands::config::show_example(),
        },
    }

    Ok(())
}
