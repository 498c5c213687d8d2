//! Routing decision types and the decision trail recorder

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Final routing outcome for one extraction
///
/// Every field is populated on output. `evidence` is empty when no
/// restriction applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    /// Display name of the assigned operator, or the fallback label
    pub route: String,
    /// Advisory volume flags; never affect `route`
    pub flags: Vec<String>,
    /// Human-readable justification
    pub reason: String,
    /// Literal excerpt supporting a restriction match
    #[serde(default)]
    pub evidence: String,
    /// Ordered trail of evaluation steps
    pub logs: Vec<String>,
    /// Page count applied to the assignee's workload
    pub page_count: u32,
}

impl RoutingDecision {
    /// Whether the decision was forced by a restriction match
    pub fn is_restricted(&self) -> bool {
        !self.evidence.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Serialize to the JSON output contract
    pub fn to_json_pretty(&self) -> Result<String, super::error::RoutingError> {
        serde_json::to_string_pretty(self).map_err(|source| {
            super::error::RoutingError::SerializationError {
                context: "routing decision".to_string(),
                source,
            }
        })
    }
}

/// Stage of a single routing evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStage {
    Start,
    RestrictionCheck,
    SpecialistAssign,
    BalancedAssign,
    Complete,
}

/// Records the human-readable trail for one decision
///
/// Entries are kept in insertion order and mirrored to `tracing` at debug
/// level so the trail and the process logs line up.
#[derive(Debug)]
pub struct DecisionTrail {
    stage: DecisionStage,
    entries: Vec<String>,
}

impl Default for DecisionTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTrail {
    pub fn new() -> Self {
        Self {
            stage: DecisionStage::Start,
            entries: Vec::new(),
        }
    }

    pub fn stage(&self) -> DecisionStage {
        self.stage
    }

    /// Move to the next evaluation stage
    pub fn enter(&mut self, stage: DecisionStage) {
        tracing::trace!(from = ?self.stage, to = ?stage, "decision stage transition");
        self.stage = stage;
    }

    /// Append a trail entry
    pub fn record(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(stage = ?self.stage, "{}", entry);
        self.entries.push(entry);
    }

    /// Append a warning entry
    pub fn warn(&mut self, entry: impl AsRef<str>) {
        self.record(format!("WARNING: {}", entry.as_ref()));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Routing statistics with lock-free atomic counters
#[derive(Default)]
pub struct RoutingStatistics {
    total_decisions: AtomicU64,
    specialist_routes: AtomicU64,
    fallback_routes: AtomicU64,
    balanced_routes: AtomicU64,
    empty_pool_failures: AtomicU64,
    high_volume_flags: AtomicU64,
    low_volume_flags: AtomicU64,
    pages_assigned: AtomicU64,
}

/// Point-in-time copy of [`RoutingStatistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub total_decisions: u64,
    pub specialist_routes: u64,
    pub fallback_routes: u64,
    pub balanced_routes: u64,
    pub empty_pool_failures: u64,
    pub high_volume_flags: u64,
    pub low_volume_flags: u64,
    pub pages_assigned: u64,
}

impl std::fmt::Debug for RoutingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingStatistics")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl RoutingStatistics {
    /// Record a completed decision
    ///
    /// `fallback` is true when a restricted document was sent to the fallback
    /// label because the roster had no specialist.
    pub fn record_decision(&self, decision: &RoutingDecision, fallback: bool) {
        self.total_decisions.fetch_add(1, Ordering::Relaxed);

        if fallback {
            self.fallback_routes.fetch_add(1, Ordering::Relaxed);
        } else if decision.is_restricted() {
            self.specialist_routes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.balanced_routes.fetch_add(1, Ordering::Relaxed);
        }

        if decision.has_flag(super::flags::VolumeFlag::HighVolume.label()) {
            self.high_volume_flags.fetch_add(1, Ordering::Relaxed);
        }
        if decision.has_flag(super::flags::VolumeFlag::LowVolume.label()) {
            self.low_volume_flags.fetch_add(1, Ordering::Relaxed);
        }

        if !fallback {
            self.pages_assigned
                .fetch_add(u64::from(decision.page_count), Ordering::Relaxed);
        }
    }

    /// Record a decision that failed because no generalist was available
    pub fn record_empty_pool(&self) {
        self.empty_pool_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_decisions(&self) -> u64 {
        self.total_decisions.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            total_decisions: self.total_decisions.load(Ordering::Relaxed),
            specialist_routes: self.specialist_routes.load(Ordering::Relaxed),
            fallback_routes: self.fallback_routes.load(Ordering::Relaxed),
            balanced_routes: self.balanced_routes.load(Ordering::Relaxed),
            empty_pool_failures: self.empty_pool_failures.load(Ordering::Relaxed),
            high_volume_flags: self.high_volume_flags.load(Ordering::Relaxed),
            low_volume_flags: self.low_volume_flags.load(Ordering::Relaxed),
            pages_assigned: self.pages_assigned.load(Ordering::Relaxed),
        }
    }
}
