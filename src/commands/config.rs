use anyhow::Result;
use clap::ArgMatches;

pub fn run(matches: &ArgMatches) -> Result<()> {
    let config = super::load_config(matches)?;
    eprintln!(
        "✓ Configuration valid (restriction set {} v{})",
        config.restrictions.name, config.restrictions.version
    );
    print!("{}", config.to_toml_string()?);
    Ok(())
}
