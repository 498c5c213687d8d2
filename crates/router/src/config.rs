//! Configuration management for the routing engine
//!
//! Restricted prefixes, restricted keywords and false-positive suppression
//! rules are named, versioned data rather than constants. Configuration loads
//! from TOML, can be overridden from the environment, and is validated before
//! an engine is built from it.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::routing::normalize::normalize_prefix;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Environment variable error: {message}")]
    EnvError { message: String },

    #[error("IO error reading config file: {message}")]
    IoError { message: String },

    #[error("Configuration parsing error: {message}")]
    ParseError { message: String },
}

/// Main router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Restricted prefix and keyword sets
    pub restrictions: RestrictionConfig,
    /// Advisory volume flag thresholds
    pub flags: FlagConfig,
    /// Assignment settings
    pub assignment: AssignmentConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Versioned restriction data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictionConfig {
    /// Name of the restriction set
    pub name: String,
    /// Version of the restriction set
    pub version: String,
    /// Part-number prefixes that require the specialist
    pub prefixes: Vec<String>,
    /// Document-wide terms that require the specialist, scanned in this order
    pub keywords: Vec<String>,
    /// Known extraction artifacts to ignore
    pub suppressions: Vec<SuppressionRule>,
}

/// False-positive suppression rule
///
/// A line item whose part number starts with `part_number_prefix` and whose
/// normalized prefixes contain `prefix` is skipped entirely by the line scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionRule {
    pub part_number_prefix: String,
    pub prefix: String,
}

/// Advisory flag thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
    /// Line count at or above which the high-volume flag is raised
    pub high_volume_threshold: u32,
    /// Line count at or below which (and above zero) the low-volume flag is raised
    pub low_volume_max: u32,
}

/// Assignment settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Route label used when a restricted document finds no specialist on the roster
    pub specialist_fallback_label: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            version: "1".to_string(),
            prefixes: ["10", "21", "22", "51", "59", "82", "83", "73", "AL"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            keywords: [
                "MK",
                "GMK",
                "SKD",
                "KA",
                "KEYED",
                "MASTER KEY",
                "GRAND MASTER",
                "KESO",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            suppressions: vec![SuppressionRule {
                part_number_prefix: "31".to_string(),
                prefix: "AL".to_string(),
            }],
        }
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            high_volume_threshold: 10,
            low_volume_max: 3,
        }
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            specialist_fallback_label: "Keying Dept".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                reason: format!("Unknown log format '{}'", other),
            }),
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.logging.level = config.logging.level.trim().to_ascii_lowercase();
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Override fields from `ORDERDESK_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(level) = env::var("ORDERDESK_LOG_LEVEL") {
            self.logging.level = level.trim().to_ascii_lowercase();
        }

        if let Ok(format) = env::var("ORDERDESK_LOG_FORMAT") {
            self.logging.format = format.parse().map_err(|e| ConfigError::EnvError {
                message: format!("ORDERDESK_LOG_FORMAT: {}", e),
            })?;
        }

        if let Ok(prefixes) = env::var("ORDERDESK_RESTRICTED_PREFIXES") {
            self.restrictions.prefixes = split_list(&prefixes);
        }

        if let Ok(keywords) = env::var("ORDERDESK_RESTRICTED_KEYWORDS") {
            self.restrictions.keywords = split_list(&keywords);
        }

        if let Ok(label) = env::var("ORDERDESK_FALLBACK_LABEL") {
            self.assignment.specialist_fallback_label = label;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels
            .iter()
            .any(|level| level.eq_ignore_ascii_case(self.logging.level.trim()))
        {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                reason: format!("Must be one of: {}", valid_levels.join(", ")),
            });
        }

        for prefix in &self.restrictions.prefixes {
            if normalize_prefix(prefix).is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "restrictions.prefixes".to_string(),
                    reason: format!("Prefix '{}' has no alphanumeric characters", prefix),
                });
            }
        }

        if self.restrictions.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "restrictions.keywords".to_string(),
                reason: "Keywords cannot be blank".to_string(),
            });
        }

        for rule in &self.restrictions.suppressions {
            if rule.part_number_prefix.is_empty() || normalize_prefix(&rule.prefix).is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "restrictions.suppressions".to_string(),
                    reason: format!(
                        "Suppression rule needs a part number prefix and a prefix, got ('{}', '{}')",
                        rule.part_number_prefix, rule.prefix
                    ),
                });
            }
        }

        if self.flags.low_volume_max == 0
            || self.flags.low_volume_max >= self.flags.high_volume_threshold
        {
            return Err(ConfigError::InvalidValue {
                key: "flags".to_string(),
                reason: format!(
                    "Expected 0 < low_volume_max ({}) < high_volume_threshold ({})",
                    self.flags.low_volume_max, self.flags.high_volume_threshold
                ),
            });
        }

        if self.assignment.specialist_fallback_label.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "assignment.specialist_fallback_label".to_string(),
            });
        }

        Ok(())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
