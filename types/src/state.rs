//! Per-user gate state.

use serde::{Deserialize, Serialize};

/// Where a user stands in the onboarding flow.
///
/// Derived from the authoritative stores (verified flag, pending challenge,
/// lockout deadline) rather than stored separately, so it can never disagree
/// with them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateState {
    /// No verification attempt in flight and not yet verified.
    Unknown,
    /// A failed attempt armed the lockout; entry is refused until it expires.
    LockedOut,
    /// A challenge is outstanding and awaiting the user's answer.
    NeedsCaptcha,
    /// The user passed the challenge at least once. Terminal.
    Verified,
}

impl GateState {
    /// Whether the gate will accept a challenge answer from this user.
    pub fn awaits_answer(&self) -> bool {
        matches!(self, Self::NeedsCaptcha)
    }

    /// Whether the user has full access to bot features.
    pub fn has_access(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Whether entry is currently refused outright.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::LockedOut)
    }
}
