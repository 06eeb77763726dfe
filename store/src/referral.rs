//! Referral ledger trait.

use crate::StoreError;
use gatebot_types::UserId;

/// Durable referrer-of relationship plus the balance-credit operation.
///
/// The ledger does not deduplicate reward credits; the orchestrator
/// guarantees at most one credit per referred user by gating on the
/// verified-flag transition.
pub trait ReferralLedger {
    /// Record `referrer` as `user`'s inviter if no inviter is recorded yet.
    ///
    /// First-writer-wins for the lifetime of the user; later calls (same or
    /// different referrer) are ignored. Self-referral is rejected silently.
    /// Returns `true` only when the relationship was recorded by this call.
    fn record_referrer_if_absent(
        &self,
        user: UserId,
        referrer: UserId,
    ) -> Result<bool, StoreError>;

    fn referrer_of(&self, user: UserId) -> Result<Option<UserId>, StoreError>;

    /// Increase `referrer`'s balance by `amount`.
    ///
    /// Returns the new balance, or `None` when the referrer has no record.
    /// The `None` case is a silent no-op, since referral links may carry ids
    /// that never made contact.
    fn credit_reward(&self, referrer: UserId, amount: u64) -> Result<Option<u64>, StoreError>;
}
