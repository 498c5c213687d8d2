pub mod batch;
pub mod config;
pub mod route;

use anyhow::{Context, Result};
use clap::ArgMatches;
use orderdesk_router::config::{LogFormat, LoggingConfig};
use orderdesk_router::{ExtractionResult, RouterConfig, TeamRoster};
use std::path::Path;

/// Resolve configuration: file (if given) or defaults, then `ORDERDESK_*` overrides
pub fn load_config(matches: &ArgMatches) -> Result<RouterConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => RouterConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => RouterConfig::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing on stderr; `RUST_LOG` takes precedence over the configured level
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.level.to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

pub fn read_extraction(path: &Path) -> Result<ExtractionResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read extraction {}", path.display()))?;
    ExtractionResult::from_json(&content)
        .with_context(|| format!("invalid extraction JSON in {}", path.display()))
}

pub fn read_roster(path: &Path) -> Result<TeamRoster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    TeamRoster::from_json(&content)
        .with_context(|| format!("invalid roster JSON in {}", path.display()))
}

pub fn write_roster(path: &Path, roster: &TeamRoster) -> Result<()> {
    let content = serde_json::to_string_pretty(roster)?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("failed to write roster {}", path.display()))?;
    tracing::info!(path = %path.display(), members = roster.len(), "roster written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_roster_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"1","name":"Dev","role":"Order Entry","cards":2,"totalPages":9}}]"#
        )
        .unwrap();

        let roster = read_roster(file.path()).unwrap();
        assert_eq!(roster.members()[0].total_pages, 9);

        write_roster(file.path(), &roster).unwrap();
        assert_eq!(read_roster(file.path()).unwrap(), roster);
    }

    #[test]
    fn test_bad_extraction_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = read_extraction(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid extraction JSON"));
    }
}
