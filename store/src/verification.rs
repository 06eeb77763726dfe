//! Verification ledger trait.

use crate::StoreError;
use gatebot_types::UserId;

/// Durable per-user verified flag, the single source of truth for gate
/// decisions.
pub trait VerificationLedger {
    fn is_verified(&self, user: UserId) -> Result<bool, StoreError>;

    /// Mark `user` verified. Idempotent and monotonic: there is no unset.
    ///
    /// Returns `true` only when this call performed the false→true
    /// transition, so the caller can couple one-shot effects (the referral
    /// reward) to the edge instead of re-reading the flag. Unknown users are
    /// an error; records are created on first contact, before any
    /// verification attempt.
    fn set_verified(&self, user: UserId) -> Result<bool, StoreError>;
}
