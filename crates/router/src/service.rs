//! Shared routing service
//!
//! Owns the live roster and serializes every read-decide-write cycle through
//! one lock, so two documents routed at the same time can never both see the
//! same operator as least loaded. Restriction detection does not touch the
//! roster and runs without the lock.

use parking_lot::Mutex;

use crate::routing::{
    apply_decision_in_place, RestrictionMatch, RoutingDecision, RoutingEngine, RoutingError,
    RoutingResult, RoutingStatistics, StatisticsSnapshot,
};
use crate::types::{ExtractionResult, TeamRoster};

/// Routing engine plus the roster it assigns against
#[derive(Debug)]
pub struct RoutingService {
    engine: RoutingEngine,
    roster: Mutex<TeamRoster>,
    statistics: RoutingStatistics,
}

impl RoutingService {
    pub fn new(engine: RoutingEngine, roster: TeamRoster) -> Self {
        Self {
            engine,
            roster: Mutex::new(roster),
            statistics: RoutingStatistics::default(),
        }
    }

    pub fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    /// Route one extraction and apply it to the roster atomically
    pub fn route(&self, extraction: &ExtractionResult) -> RoutingResult<RoutingDecision> {
        let mut roster = self.roster.lock();

        let decision = match self.engine.route(extraction, &roster) {
            Ok(decision) => decision,
            Err(err) => {
                if matches!(err, RoutingError::EmptyPool { .. }) {
                    self.statistics.record_empty_pool();
                }
                return Err(err);
            }
        };

        apply_decision_in_place(&mut roster, &decision);
        drop(roster);

        self.statistics
            .record_decision(&decision, self.engine.is_fallback(&decision));
        Ok(decision)
    }

    /// Restriction check without assignment
    pub fn detect(&self, extraction: &ExtractionResult) -> Option<RestrictionMatch> {
        self.engine.detect(extraction)
    }

    /// Copy of the current roster
    pub fn roster(&self) -> TeamRoster {
        self.roster.lock().clone()
    }

    /// Swap in a roster maintained elsewhere, returning the previous one
    pub fn replace_roster(&self, roster: TeamRoster) -> TeamRoster {
        std::mem::replace(&mut *self.roster.lock(), roster)
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }

    pub fn into_roster(self) -> TeamRoster {
        self.roster.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::types::{LineItem, Role, TeamMember};

    fn service(roster: Vec<TeamMember>) -> RoutingService {
        let engine = RoutingEngine::new(&RouterConfig::default()).unwrap();
        RoutingService::new(engine, TeamRoster::new(roster))
    }

    #[test]
    fn test_sequential_routing_rebalances() {
        let service = service(vec![
            TeamMember::new("1", "Dev", Role::OrderEntry).with_load(0, 5),
            TeamMember::new("2", "Ana", Role::OrderEntry).with_load(0, 0),
        ]);
        let order = ExtractionResult {
            page_count: Some(6),
            ..Default::default()
        };

        assert_eq!(service.route(&order).unwrap().route, "Ana");
        assert_eq!(service.route(&order).unwrap().route, "Dev");
        assert_eq!(service.route(&order).unwrap().route, "Ana");

        let roster = service.into_roster();
        assert_eq!(roster.find_by_name("Ana").unwrap().total_pages, 12);
        assert_eq!(roster.find_by_name("Ana").unwrap().cards, 2);
        assert_eq!(roster.find_by_name("Dev").unwrap().total_pages, 11);
    }

    #[test]
    fn test_statistics_and_empty_pool() {
        let service = service(vec![TeamMember::new("1", "Maureen", Role::Keying)]);

        let restricted = ExtractionResult {
            line_items: vec![LineItem {
                part_number: "8804".to_string(),
                prefixes: vec!["59".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(service.detect(&restricted).is_some());
        assert_eq!(service.route(&restricted).unwrap().route, "Maureen");
        assert!(service.route(&ExtractionResult::default()).is_err());

        let stats = service.statistics();
        assert_eq!(stats.total_decisions, 1);
        assert_eq!(stats.specialist_routes, 1);
        assert_eq!(stats.empty_pool_failures, 1);
        assert_eq!(service.roster().members()[0].cards, 1);
    }

    #[test]
    fn test_replace_roster() {
        let service = service(vec![TeamMember::new("1", "Dev", Role::OrderEntry)]);
        let previous =
            service.replace_roster(TeamRoster::new(vec![TeamMember::new("9", "Lee", Role::OrderEntry)]));
        assert_eq!(previous.members()[0].name, "Dev");
        assert_eq!(
            service.route(&ExtractionResult::default()).unwrap().route,
            "Lee"
        );
    }
}
