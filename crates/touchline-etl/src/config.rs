use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};

use crate::crawl::CrawlSettings;
use crate::layout::DataLayout;

/// Configuration for touchline.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (TOUCHLINE_* prefix)
/// 3. Config file (~/.config/touchline/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory of the raw and canonical JSON artifacts.
    ///
    /// Can be set via:
    /// - CLI: --data-dir /path/to/data
    /// - ENV: TOUCHLINE_DATA_DIR
    /// - Config: data_dir = "/path/to/data"
    pub data_dir: PathBuf,

    /// Provider page that lists fixtures (and triggers the club list call).
    pub fixtures_url: String,

    /// URL prefix of the provider's paginated fixtures API.
    pub fixtures_api_prefix: String,

    /// URL prefix of the provider's club list API.
    pub clubs_api_prefix: String,

    /// Run Chrome without a visible window.
    pub headless: bool,

    /// Competition filter used when `--competition` is not given.
    pub default_competition: String,

    /// Label the league filter shows before a league is chosen.
    pub league_placeholder: String,

    pub navigation_timeout_secs: u64,
    pub response_timeout_secs: u64,
    pub settle_timeout_secs: u64,
    pub settle_quiet_ms: u64,
    pub load_more_attempts: u32,
    pub load_more_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            fixtures_url: "https://fv.dribl.com/fixtures/".to_string(),
            fixtures_api_prefix: "https://mc-api.dribl.com/api/fixtures".to_string(),
            clubs_api_prefix: "https://mc-api.dribl.com/api/list/clubs".to_string(),
            headless: true,
            default_competition: "FFV".to_string(),
            league_placeholder: "All leagues".to_string(),
            navigation_timeout_secs: 30,
            response_timeout_secs: 60,
            settle_timeout_secs: 15,
            settle_quiet_ms: 750,
            load_more_attempts: 10,
            load_more_poll_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/touchline/config.toml
    /// Reads environment variables with TOUCHLINE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("touchline");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, overriding the data directory.
    ///
    /// This is used when the --data-dir CLI flag is provided.
    pub fn load_with_data_dir(data_dir: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.data_dir = data_dir;
        Ok(config)
    }

    /// Paths of the artifacts under `data_dir`.
    #[must_use]
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_dir)
    }

    /// Browser wait bounds for the crawl stages.
    #[must_use]
    pub fn crawl_settings(&self) -> CrawlSettings {
        CrawlSettings {
            navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
            response_timeout: Duration::from_secs(self.response_timeout_secs),
            settle_timeout: Duration::from_secs(self.settle_timeout_secs),
            settle_quiet: Duration::from_millis(self.settle_quiet_ms),
            load_more_attempts: self.load_more_attempts,
            load_more_poll: Duration::from_millis(self.load_more_poll_ms),
            ..CrawlSettings::default()
        }
    }
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/touchline/config.toml
/// - macOS: ~/Library/Application Support/touchline/config.toml
/// - Windows: %APPDATA%\touchline\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("touchline")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Touchline Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (TOUCHLINE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Root of the JSON artifacts (raw crawls under external/, canonical files
# under clubs/ and matches/)
#
# Can also be set via:
# - CLI: touchline --data-dir /srv/site/data sync clubs
# - Environment: TOUCHLINE_DATA_DIR=/srv/site/data
data_dir = "data"

# Fixtures provider
fixtures_url = "https://fv.dribl.com/fixtures/"
fixtures_api_prefix = "https://mc-api.dribl.com/api/fixtures"
clubs_api_prefix = "https://mc-api.dribl.com/api/list/clubs"

# Set to false to watch the browser while it crawls
headless = true

# Filter labels
default_competition = "FFV"
league_placeholder = "All leagues"

# Browser wait bounds
navigation_timeout_secs = 30
response_timeout_secs = 60
settle_timeout_secs = 15
settle_quiet_ms = 750
load_more_attempts = 10
load_more_poll_ms = 500
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
