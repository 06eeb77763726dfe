//! User storage trait.

use crate::StoreError;
use gatebot_types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Per-user record. Created on first contact, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    /// Monotonic: flips false→true once, never back.
    pub verified: bool,
    /// Diamond balance. Mutated only by reward credits and admin grants.
    pub balance: u64,
    /// First-writer-wins; never the user's own id.
    pub referred_by: Option<UserId>,
    pub created_at: Timestamp,
}

impl UserRecord {
    /// A fresh, unverified record with zero balance.
    pub fn new(id: UserId, display_name: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            verified: false,
            balance: 0,
            referred_by: None,
            created_at,
        }
    }
}

/// Trait for user storage operations.
pub trait UserStore {
    /// Load the record for `id`, or `None` if the user has never made contact.
    fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Create the record on first contact; on later calls refresh the display
    /// name if it changed. Returns the stored record either way.
    fn ensure_user(
        &self,
        id: UserId,
        display_name: &str,
        now: Timestamp,
    ) -> Result<UserRecord, StoreError>;

    fn user_count(&self) -> Result<u64, StoreError>;

    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Count verified users without the caller filtering by hand.
    fn verified_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .iter_users()?
            .iter()
            .filter(|u| u.verified)
            .count() as u64)
    }

    /// Every known user id, for broadcast fan-out.
    fn all_user_ids(&self) -> Result<Vec<UserId>, StoreError> {
        Ok(self.iter_users()?.into_iter().map(|u| u.id).collect())
    }

    /// Top `limit` users by balance, richest first; ties break by user id.
    fn top_by_balance(&self, limit: usize) -> Result<Vec<UserRecord>, StoreError> {
        let mut users = self.iter_users()?;
        users.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.id.cmp(&b.id)));
        users.truncate(limit);
        Ok(users)
    }

    /// How many users name `id` as their referrer.
    fn referral_count(&self, id: UserId) -> Result<u64, StoreError> {
        Ok(self
            .iter_users()?
            .iter()
            .filter(|u| u.referred_by == Some(id))
            .count() as u64)
    }
}
