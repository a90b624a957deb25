use anyhow::Result;
use touchline_etl::status::Status;
use touchline_etl::Config;

pub fn show_status(config: &Config) -> Result<()> {
    let layout = config.layout();
    let status = Status::collect(&layout)?;

    println!("\nTouchline Status\n");
    println!("  Data directory: {}", layout.root().display());
    println!(
        "  Raw club list: {}",
        if status.raw_clubs { "present" } else { "missing" }
    );
    match status.clubs {
        Some(count) => println!("  Canonical clubs: {count}"),
        None => println!("  Canonical clubs: not synced"),
    }

    if status.teams.is_empty() {
        println!("\n  No teams crawled yet. Run `touchline crawl fixtures` to start.");
        return Ok(());
    }

    println!("\n  Teams:");
    for team in &status.teams {
        let synced = match team.synced {
            Some((fixtures, rounds)) => format!("{fixtures} fixtures, {rounds} rounds"),
            None => "not synced".to_string(),
        };
        println!("    {:<16} {:>3} chunks  {synced}", team.team, team.chunks);
    }

    Ok(())
}
