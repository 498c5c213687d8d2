use anyhow::Result;
use clap::ArgMatches;
use orderdesk_router::RoutingEngine;
use std::path::Path;

pub fn run(matches: &ArgMatches) -> Result<()> {
    let config = super::load_config(matches)?;
    super::init_tracing(&config.logging);

    let input = Path::new(
        matches
            .get_one::<String>("input")
            .expect("input argument is required"),
    );
    let roster_path = Path::new(
        matches
            .get_one::<String>("roster")
            .expect("roster argument is required"),
    );

    let extraction = super::read_extraction(input)?;
    let roster = super::read_roster(roster_path)?;

    let engine = RoutingEngine::new(&config)?;
    let (decision, updated) = engine.decide(&extraction, &roster)?;

    println!("{}", decision.to_json_pretty()?);

    if matches.get_flag("write-roster") {
        super::write_roster(roster_path, &updated)?;
    }

    Ok(())
}
