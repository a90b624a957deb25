use anyhow::{bail, Result};
use touchline_etl::{sync_all_fixtures, sync_clubs, sync_fixtures, Config, FixtureSyncReport};

pub fn run_sync_clubs(config: &Config) -> Result<()> {
    let report = sync_clubs(&config.layout())?;
    println!(
        "✓ Clubs: {} new, {} updated, {} preserved ({} total)",
        report.stats.added, report.stats.updated, report.stats.preserved, report.total
    );
    println!("  in {}", report.path.display());
    Ok(())
}

fn print_report(report: &FixtureSyncReport) {
    println!(
        "✓ {}: {} fixtures over {} rounds",
        report.team, report.total_fixtures, report.total_rounds
    );
    println!(
        "  {} scraped from {} chunks, {} skipped, {} duplicates dropped",
        report.scraped, report.chunks, report.skipped, report.duplicates
    );
    println!("  in {}", report.path.display());
}

pub fn run_sync_fixtures(config: &Config, team: &str) -> Result<()> {
    let report = sync_fixtures(&config.layout(), team)?;
    print_report(&report);
    Ok(())
}

pub fn run_sync_all_fixtures(config: &Config) -> Result<()> {
    let results = sync_all_fixtures(&config.layout())?;
    if results.is_empty() {
        println!("No crawled teams found. Run `touchline crawl fixtures` first.");
        return Ok(());
    }

    let mut failed = 0;
    for (team, result) in &results {
        match result {
            Ok(report) => print_report(report),
            Err(e) => {
                failed += 1;
                println!("✗ {team}: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} teams failed to sync", results.len());
    }
    Ok(())
}
