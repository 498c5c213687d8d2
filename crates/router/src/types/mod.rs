//! Data types shared by the routing engine and its callers

pub mod extraction;
pub mod roster;

pub use extraction::{CustomerInfo, ExtractionResult, LineItem, Page, PageItem};
pub use roster::{Role, TeamMember, TeamRoster, WorkloadSummary};
