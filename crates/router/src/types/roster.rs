//! Operator roster types
//!
//! The roster is owned outside the engine. The engine only reads snapshots of
//! it and hands back updated copies; it never adds or removes members.

use serde::{Deserialize, Serialize};

/// Operator role tag
///
/// Roles are matched as whole tags rather than by substring so that a title
/// such as "Keying Backup" is never mistaken for the specialist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Generalist eligible for workload-balanced assignment
    OrderEntry,
    /// Specialist receiving restricted documents
    Keying,
    /// Any other role; never selected by the engine
    Other(String),
}

impl Role {
    pub fn is_generalist(&self) -> bool {
        matches!(self, Role::OrderEntry)
    }

    pub fn is_specialist(&self) -> bool {
        matches!(self, Role::Keying)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("order entry") {
            Role::OrderEntry
        } else if trimmed.eq_ignore_ascii_case("keying") {
            Role::Keying
        } else {
            Role::Other(value)
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::OrderEntry => write!(f, "Order Entry"),
            Role::Keying => write!(f, "Keying"),
            Role::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A single operator and their accumulated workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Orders handled
    #[serde(default)]
    pub cards: u32,
    /// Page-weighted workload
    #[serde(default)]
    pub total_pages: u64,
}

impl TeamMember {
    /// Create a member with no accumulated workload
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            cards: 0,
            total_pages: 0,
        }
    }

    /// Set the starting workload
    pub fn with_load(mut self, cards: u32, total_pages: u64) -> Self {
        self.cards = cards;
        self.total_pages = total_pages;
        self
    }
}

/// Ordered snapshot of every operator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRoster {
    members: Vec<TeamMember>,
}

/// Aggregate workload across the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadSummary {
    pub members: usize,
    pub cards: u64,
    pub total_pages: u64,
}

impl TeamRoster {
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self { members }
    }

    /// Parse a roster from a JSON array of members
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [TeamMember] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Generalists in roster order
    pub fn generalists(&self) -> impl Iterator<Item = &TeamMember> {
        self.members.iter().filter(|m| m.role.is_generalist())
    }

    /// First specialist in roster order, if any
    pub fn specialist(&self) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.role.is_specialist())
    }

    /// First member with the given display name
    pub fn find_by_name(&self, name: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn workload(&self) -> WorkloadSummary {
        WorkloadSummary {
            members: self.members.len(),
            cards: self.members.iter().map(|m| u64::from(m.cards)).sum(),
            total_pages: self.members.iter().map(|m| m.total_pages).sum(),
        }
    }
}

impl From<Vec<TeamMember>> for TeamRoster {
    fn from(members: Vec<TeamMember>) -> Self {
        Self::new(members)
    }
}
