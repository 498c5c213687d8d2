//! Workload balancing across generalist operators

use super::decision::DecisionTrail;
use super::error::{RoutingError, RoutingResult};
use crate::types::{Role, TeamMember, TeamRoster};

/// Generalist selected by the balancer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedPick<'a> {
    pub member: &'a TeamMember,
    /// Page load before this decision is applied
    pub load: u64,
}

impl BalancedPick<'_> {
    pub fn reason(&self) -> String {
        format!("Lowest Page Load ({}pgs)", self.load)
    }
}

/// Picks the least-loaded generalist
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkloadBalancer;

impl WorkloadBalancer {
    pub fn new() -> Self {
        Self
    }

    /// Select the generalist with the lowest `total_pages`
    ///
    /// Ties go to whoever appears first in roster order. An empty pool is an
    /// error; the balancer never invents an assignee.
    pub fn select<'a>(
        &self,
        roster: &'a TeamRoster,
        trail: &mut DecisionTrail,
    ) -> RoutingResult<BalancedPick<'a>> {
        trail.record("Calculating workload balance...");

        // min_by_key keeps the first of several equal minimums
        let member = roster
            .generalists()
            .min_by_key(|m| m.total_pages)
            .ok_or_else(|| {
                tracing::warn!(roster_size = roster.len(), "no generalists available");
                RoutingError::EmptyPool {
                    role: Role::OrderEntry,
                }
            })?;

        trail.record(format!(
            "Lowest load: {} ({}pgs)",
            member.name, member.total_pages
        ));

        Ok(BalancedPick {
            member,
            load: member.total_pages,
        })
    }
}
