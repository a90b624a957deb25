use anyhow::Result;
use touchline_etl::{crawl_clubs, crawl_fixtures, Config, FixtureCrawlRequest};

pub fn run_crawl_clubs(config: &Config, url: Option<&str>) -> Result<()> {
    let report = crawl_clubs(config, url)?;
    println!("✓ Captured {} clubs", report.clubs);
    println!("  in {}", report.path.display());
    println!("\nRun `touchline sync clubs` to merge them.");
    Ok(())
}

pub fn run_crawl_fixtures(
    config: &Config,
    team: String,
    league: String,
    season: Option<i32>,
    competition: Option<String>,
) -> Result<()> {
    let mut request = FixtureCrawlRequest::new(team, league, config);
    if let Some(season) = season {
        request.season = season;
    }
    if let Some(competition) = competition {
        request.competition = competition;
    }

    let report = crawl_fixtures(config, &request)?;
    println!(
        "✓ Captured {} fixtures in {} pages for {}",
        report.fixtures, report.chunks, report.team
    );
    println!("  in {}", report.dir.display());
    println!("\nRun `touchline sync fixtures --team {}` next.", report.team);
    Ok(())
}
