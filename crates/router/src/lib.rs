//! OrderDesk routing engine
//!
//! Classifies a purchase-order extraction and assigns it to exactly one
//! operator: restricted part prefixes and keywords go to the keying
//! specialist, everything else to the order entry generalist carrying the
//! lightest page load.
//!
//! The engine is synchronous and free of I/O. [`RoutingEngine::decide`] is the
//! pure `(extraction, roster) -> (decision, roster')` form;
//! [`RoutingService`] wraps it with a single-writer roster for concurrent
//! callers.

pub mod config;
pub mod routing;
pub mod service;
pub mod types;

pub use config::{ConfigError, RouterConfig};
pub use routing::{
    apply_decision, RestrictionMatch, RoutingDecision, RoutingEngine, RoutingError,
    RoutingResult, StatisticsSnapshot,
};
pub use service::RoutingService;
pub use types::*;
