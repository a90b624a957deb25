use std::path::PathBuf;

use anyhow::Result;
use touchline_etl::{config, Config};

/// Show the current effective configuration.
pub fn show_config(data_dir: Option<PathBuf>) -> Result<()> {
    let config = match data_dir {
        Some(dir) => Config::load_with_data_dir(dir)?,
        None => Config::load()?,
    };

    println!("Current Configuration");
    println!("=====================\n");

    let path = config::config_file_path();
    println!("Config file: {}", path.display());
    println!(
        "File exists: {}\n",
        if path.exists() { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  data_dir: {}", config.data_dir.display());
    println!("  fixtures_url: {}", config.fixtures_url);
    println!("  fixtures_api_prefix: {}", config.fixtures_api_prefix);
    println!("  clubs_api_prefix: {}", config.clubs_api_prefix);
    println!("  headless: {}", config.headless);
    println!("  default_competition: {}", config.default_competition);
    println!("  league_placeholder: {}", config.league_placeholder);
    println!("  navigation_timeout_secs: {}", config.navigation_timeout_secs);
    println!("  response_timeout_secs: {}", config.response_timeout_secs);
    println!("  settle_timeout_secs: {}", config.settle_timeout_secs);
    println!("  settle_quiet_ms: {}", config.settle_quiet_ms);
    println!("  load_more_attempts: {}", config.load_more_attempts);
    println!("  load_more_poll_ms: {}", config.load_more_poll_ms);

    println!("\nPriority: CLI args > ENV vars (TOUCHLINE_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", path.display());
        println!("\nEdit this file to configure touchline.");
    } else {
        println!("Config file already exists: {}", path.display());
    }

    Ok(())
}
