//! Core routing engine implementation
//!
//! [`RoutingEngine`] turns one extraction and a roster snapshot into a
//! [`RoutingDecision`]. It holds no mutable state: the roster is passed in and
//! an updated copy handed back, so callers decide where the roster lives and
//! how writes are serialized.

use super::balancer::WorkloadBalancer;
use super::decision::{DecisionStage, DecisionTrail, RoutingDecision};
use super::detector::{RestrictionDetector, RestrictionMatch};
use super::error::RoutingResult;
use super::flags::{volume_flag, VolumeFlag};
use super::updater::apply_decision;
use crate::config::{FlagConfig, RouterConfig};
use crate::types::{ExtractionResult, TeamRoster};

/// Routing decision engine
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    detector: RestrictionDetector,
    balancer: WorkloadBalancer,
    flags: FlagConfig,
    fallback_label: String,
    restriction_set: String,
}

/// Assignment produced by either the specialist or the balanced path
struct Assignment {
    route: String,
    reason: String,
    evidence: String,
}

impl RoutingEngine {
    /// Build an engine from validated configuration
    pub fn new(config: &RouterConfig) -> RoutingResult<Self> {
        config.validate()?;

        let restriction_set = format!(
            "{}@{}",
            config.restrictions.name, config.restrictions.version
        );
        tracing::debug!(
            restriction_set = %restriction_set,
            prefixes = config.restrictions.prefixes.len(),
            keywords = config.restrictions.keywords.len(),
            "routing engine configured"
        );

        Ok(Self {
            detector: RestrictionDetector::new(&config.restrictions),
            balancer: WorkloadBalancer::new(),
            flags: config.flags.clone(),
            fallback_label: config.assignment.specialist_fallback_label.clone(),
            restriction_set,
        })
    }

    /// Restriction set identifier, `name@version`
    pub fn restriction_set(&self) -> &str {
        &self.restriction_set
    }

    /// Run restriction detection only; read-only and safe to call concurrently
    pub fn detect(&self, extraction: &ExtractionResult) -> Option<RestrictionMatch> {
        self.detector.detect(extraction)
    }

    /// Decide where `extraction` goes given the current roster
    ///
    /// The roster is not modified; see [`RoutingEngine::decide`] for the
    /// decision together with the updated roster.
    pub fn route(
        &self,
        extraction: &ExtractionResult,
        roster: &TeamRoster,
    ) -> RoutingResult<RoutingDecision> {
        let mut trail = DecisionTrail::new();
        trail.record("Initializing routing engine...");
        trail.record("Scanning for flags...");

        let flags = self.volume_flags(extraction, &mut trail);

        trail.enter(DecisionStage::RestrictionCheck);
        let assignment = match self.detector.scan(extraction, &mut trail) {
            Some(found) => self.assign_specialist(&found, roster, &mut trail),
            None => {
                trail.record("No restrictions found");
                self.assign_balanced(roster, &mut trail)?
            }
        };

        trail.enter(DecisionStage::Complete);
        let page_count = extraction.effective_page_count();
        tracing::info!(
            po_number = %extraction.po_label(),
            route = %assignment.route,
            reason = %assignment.reason,
            page_count,
            "routing decision complete"
        );

        Ok(RoutingDecision {
            route: assignment.route,
            flags,
            reason: assignment.reason,
            evidence: assignment.evidence,
            logs: trail.into_entries(),
            page_count,
        })
    }

    /// Decide and apply in one step: `(input, roster) -> (decision, roster')`
    pub fn decide(
        &self,
        extraction: &ExtractionResult,
        roster: &TeamRoster,
    ) -> RoutingResult<(RoutingDecision, TeamRoster)> {
        let decision = self.route(extraction, roster)?;
        let updated = apply_decision(roster, &decision);
        Ok((decision, updated))
    }

    /// Whether a decision was sent to the fallback label instead of a person
    pub fn is_fallback(&self, decision: &RoutingDecision) -> bool {
        decision.is_restricted() && decision.route == self.fallback_label
    }

    fn volume_flags(&self, extraction: &ExtractionResult, trail: &mut DecisionTrail) -> Vec<String> {
        let line_count = extraction.effective_line_count();
        match volume_flag(line_count, &self.flags) {
            Some(VolumeFlag::HighVolume) => {
                trail.warn(format!("High line count ({} lines)", line_count));
                vec![VolumeFlag::HighVolume.label().to_string()]
            }
            Some(flag) => vec![flag.label().to_string()],
            None => Vec::new(),
        }
    }

    fn assign_specialist(
        &self,
        found: &RestrictionMatch,
        roster: &TeamRoster,
        trail: &mut DecisionTrail,
    ) -> Assignment {
        trail.enter(DecisionStage::SpecialistAssign);

        let route = match roster.specialist() {
            Some(specialist) => {
                trail.record(format!(
                    "Redirecting to Keying specialist: {}",
                    specialist.name
                ));
                specialist.name.clone()
            }
            None => {
                tracing::warn!(
                    fallback = %self.fallback_label,
                    "no keying specialist on roster; using fallback label"
                );
                trail.record(format!(
                    "No Keying specialist on roster, redirecting to {}",
                    self.fallback_label
                ));
                self.fallback_label.clone()
            }
        };

        Assignment {
            route,
            reason: found.reason(),
            evidence: found.evidence(),
        }
    }

    fn assign_balanced(
        &self,
        roster: &TeamRoster,
        trail: &mut DecisionTrail,
    ) -> RoutingResult<Assignment> {
        trail.enter(DecisionStage::BalancedAssign);

        let pick = self.balancer.select(roster, trail)?;
        Ok(Assignment {
            route: pick.member.name.clone(),
            reason: pick.reason(),
            evidence: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::RoutingError;
    use crate::types::{LineItem, Page, Role, TeamMember};

    fn engine() -> RoutingEngine {
        RoutingEngine::new(&RouterConfig::default()).unwrap()
    }

    fn roster() -> TeamRoster {
        TeamRoster::new(vec![
            TeamMember::new("1", "Maureen", Role::Keying).with_load(2, 40),
            TeamMember::new("2", "Dev", Role::OrderEntry).with_load(4, 25),
            TeamMember::new("3", "Ana", Role::OrderEntry).with_load(3, 12),
        ])
    }

    fn line(part: &str, prefixes: &[&str]) -> LineItem {
        LineItem {
            line_number: "1".to_string(),
            page_number: 1,
            part_number: part.to_string(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            quantity: 1.0,
        }
    }

    #[test]
    fn test_balanced_trail() {
        let extraction = ExtractionResult {
            line_items: vec![line("4000", &["40"])],
            ..Default::default()
        };
        let decision = engine().route(&extraction, &roster()).unwrap();
        assert_eq!(decision.route, "Ana");
        assert_eq!(decision.reason, "Lowest Page Load (12pgs)");
        assert_eq!(decision.evidence, "");
        assert_eq!(decision.flags, vec!["CHECKERED FLAG"]);
        assert_eq!(decision.page_count, 1);
        assert_eq!(
            decision.logs,
            vec![
                "Initializing routing engine...",
                "Scanning for flags...",
                "No restrictions found",
                "Calculating workload balance...",
                "Lowest load: Ana (12pgs)",
            ]
        );
    }

    #[test]
    fn test_restricted_trail() {
        let extraction = ExtractionResult {
            page_count: Some(3),
            pages: vec![Page {
                summary: "SKD cylinders".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let decision = engine().route(&extraction, &roster()).unwrap();
        assert_eq!(decision.route, "Maureen");
        assert_eq!(decision.reason, "Global Keyword Match");
        assert_eq!(decision.evidence, "SKD");
        assert!(decision.flags.is_empty());
        assert_eq!(decision.page_count, 3);
        assert_eq!(
            decision.logs,
            vec![
                "Initializing routing engine...",
                "Scanning for flags...",
                "Global keyword 'SKD' found",
                "Redirecting to Keying specialist: Maureen",
            ]
        );
    }

    #[test]
    fn test_fallback_label_without_specialist() {
        let roster = TeamRoster::new(vec![TeamMember::new("2", "Dev", Role::OrderEntry)]);
        let extraction = ExtractionResult {
            line_items: vec![line("5900", &["59"])],
            ..Default::default()
        };
        let engine = engine();
        let (decision, updated) = engine.decide(&extraction, &roster).unwrap();
        assert_eq!(decision.route, "Keying Dept");
        assert!(engine.is_fallback(&decision));
        assert_eq!(updated, roster);
    }

    #[test]
    fn test_high_volume_warning_in_trail() {
        let extraction = ExtractionResult {
            total_line_count: Some(10),
            ..Default::default()
        };
        let decision = engine().route(&extraction, &roster()).unwrap();
        assert_eq!(decision.flags, vec!["10+ LINES"]);
        assert_eq!(decision.logs[2], "WARNING: High line count (10 lines)");
    }

    #[test]
    fn test_empty_pool_surfaces() {
        let roster = TeamRoster::new(vec![TeamMember::new("1", "Maureen", Role::Keying)]);
        let result = engine().route(&ExtractionResult::default(), &roster);
        assert!(matches!(result, Err(RoutingError::EmptyPool { .. })));
    }

    #[test]
    fn test_restricted_document_needs_no_generalist() {
        let roster = TeamRoster::new(vec![TeamMember::new("1", "Maureen", Role::Keying)]);
        let extraction = ExtractionResult {
            routing_keywords: vec!["keso".to_string()],
            ..Default::default()
        };
        assert_eq!(engine().route(&extraction, &roster).unwrap().route, "Maureen");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RouterConfig::default();
        config.flags.low_volume_max = 50;
        assert!(matches!(
            RoutingEngine::new(&config),
            Err(RoutingError::Config(_))
        ));
    }

    #[test]
    fn test_restriction_set_label() {
        assert_eq!(engine().restriction_set(), "default@1");
    }
}
