//! Admission gate: decides whether a new connection may proceed.
//!
//! Pure function over the claim and a snapshot of the lobby counters. The caller
//! must evaluate it and apply the join inside the same critical section.

use super::{entity::Claim, value_object::ClaimType};

/// An anonymous guest is refused when more than this many *other* connections
/// are already live.
pub const ANONYMOUS_OCCUPANCY_LIMIT: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No verified claim was presented.
    MissingClaim,
    /// The relay is globally inactive.
    Inactive,
    /// Occupancy limit for anonymous guests reached.
    Occupied,
    /// The connection id is already registered.
    DuplicateConnection,
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allow)
    }
}

/// Admit(claim, currentLiveCount, globalActive).
///
/// Admins bypass both capacity and activity checks.
pub fn admit(claim: Option<&Claim>, current_live_count: usize, global_active: bool) -> Admission {
    let Some(claim) = claim else {
        return Admission::Deny(DenyReason::MissingClaim);
    };

    match claim.claim_type {
        ClaimType::Admin => Admission::Allow,
        ClaimType::Anonymous => {
            if !global_active {
                Admission::Deny(DenyReason::Inactive)
            } else if current_live_count > ANONYMOUS_OCCUPANCY_LIMIT {
                Admission::Deny(DenyReason::Occupied)
            } else {
                Admission::Allow
            }
        }
    }
}
