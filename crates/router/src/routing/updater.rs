//! Roster updates driven by completed decisions

use super::decision::RoutingDecision;
use crate::types::TeamRoster;

/// Produce the roster that results from applying `decision`
///
/// The member that gains one card and `decision.page_count` pages is the
/// first one whose name equals `decision.route` and whose role could have
/// received the decision: a specialist for a restricted decision, a generalist
/// otherwise. Two members may share a name across roles. A route that names
/// nobody eligible (the specialist fallback label) leaves the roster unchanged.
pub fn apply_decision(roster: &TeamRoster, decision: &RoutingDecision) -> TeamRoster {
    let mut updated = roster.clone();
    apply_decision_in_place(&mut updated, decision);
    updated
}

/// In-place form of [`apply_decision`]; returns whether a member was updated
pub fn apply_decision_in_place(roster: &mut TeamRoster, decision: &RoutingDecision) -> bool {
    let restricted = decision.is_restricted();
    match roster.members_mut().iter_mut().find(|m| {
        m.name == decision.route
            && if restricted {
                m.role.is_specialist()
            } else {
                m.role.is_generalist()
            }
    }) {
        Some(member) => {
            member.cards = member.cards.saturating_add(1);
            member.total_pages = member
                .total_pages
                .saturating_add(u64::from(decision.page_count));
            tracing::debug!(
                member = %member.name,
                cards = member.cards,
                total_pages = member.total_pages,
                "roster updated"
            );
            true
        }
        None => {
            tracing::debug!(route = %decision.route, "route names no roster member; roster unchanged");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, TeamMember};

    fn roster() -> TeamRoster {
        TeamRoster::new(vec![
            TeamMember::new("1", "Maureen", Role::Keying).with_load(3, 20),
            TeamMember::new("2", "Dev", Role::OrderEntry).with_load(5, 11),
            TeamMember::new("3", "Ana", Role::OrderEntry).with_load(2, 9),
        ])
    }

    fn restricted(route: &str, page_count: u32) -> RoutingDecision {
        RoutingDecision {
            reason: "Restricted Prefix '83'".to_string(),
            evidence: "Line: 1\nPage: 1\nPart: 8300\nPrefix: [83]".to_string(),
            ..decision(route, page_count)
        }
    }

    fn decision(route: &str, page_count: u32) -> RoutingDecision {
        RoutingDecision {
            route: route.to_string(),
            flags: Vec::new(),
            reason: String::new(),
            evidence: String::new(),
            logs: Vec::new(),
            page_count,
        }
    }

    #[test]
    fn test_counters_increment() {
        let before = roster();
        let after = apply_decision(&before, &decision("Dev", 7));

        let dev = after.find_by_name("Dev").unwrap();
        assert_eq!(dev.cards, 6);
        assert_eq!(dev.total_pages, 18);

        assert_eq!(after.members()[0], before.members()[0]);
        assert_eq!(after.members()[2], before.members()[2]);
        // Input snapshot is untouched.
        assert_eq!(before.find_by_name("Dev").unwrap().total_pages, 11);
    }

    #[test]
    fn test_unknown_route_is_noop() {
        let mut current = roster();
        assert!(!apply_decision_in_place(&mut current, &decision("Keying Dept", 4)));
        assert_eq!(current, roster());
    }

    #[test]
    fn test_shared_name_updates_member_with_matching_role() {
        let shared = TeamRoster::new(vec![
            TeamMember::new("1", "Sam", Role::Keying).with_load(1, 4),
            TeamMember::new("2", "Sam", Role::OrderEntry).with_load(2, 6),
        ]);

        let balanced = apply_decision(&shared, &decision("Sam", 3));
        assert_eq!(balanced.members()[0], shared.members()[0]);
        assert_eq!(balanced.members()[1].cards, 3);
        assert_eq!(balanced.members()[1].total_pages, 9);

        let diverted = apply_decision(&shared, &restricted("Sam", 5));
        assert_eq!(diverted.members()[0].cards, 2);
        assert_eq!(diverted.members()[0].total_pages, 9);
        assert_eq!(diverted.members()[1], shared.members()[1]);
    }

    #[test]
    fn test_role_mismatch_is_noop() {
        let mut current = roster();
        assert!(!apply_decision_in_place(&mut current, &restricted("Dev", 2)));
        assert!(!apply_decision_in_place(&mut current, &decision("Maureen", 2)));
        assert_eq!(current, roster());
    }
}
