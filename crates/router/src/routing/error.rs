//! Error types for the routing module

use crate::config::ConfigError;
use crate::types::Role;
use thiserror::Error;

/// Errors that can occur during routing operations
///
/// The absence of a restriction match is not an error; only conditions that
/// make assignment impossible, or a broken configuration, surface here.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("No eligible operators with role '{role}' on the roster")]
    EmptyPool { role: Role },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {context} - {source}")]
    SerializationError {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;

impl RoutingError {
    /// Check if the error is retryable
    ///
    /// An empty pool can clear once the roster changes; configuration and
    /// input errors cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RoutingError::EmptyPool { .. })
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RoutingError::EmptyPool { .. } => ErrorSeverity::High,
            RoutingError::Config(_) => ErrorSeverity::Critical,
            RoutingError::SerializationError { .. } => ErrorSeverity::Medium,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}
