//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Same observable semantics as the LMDB-backed stores, minus durability.

use gatebot_store::user::{UserRecord, UserStore};
use gatebot_store::{ChannelStore, ReferralLedger, StoreError, TextStore, VerificationLedger};
use gatebot_types::{ChannelId, Timestamp, UserId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

/// An in-memory user store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct MemoryUserStore {
    users: Mutex<BTreeMap<i64, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
        }
    }

    /// Seed a record directly, bypassing `ensure_user`.
    pub fn put_user(&self, record: UserRecord) {
        self.users
            .lock()
            .unwrap()
            .insert(record.id.as_i64(), record);
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemoryUserStore {
    fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.lock().unwrap().get(&id.as_i64()).cloned())
    }

    fn ensure_user(
        &self,
        id: UserId,
        display_name: &str,
        now: Timestamp,
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.users.lock().unwrap();
        let record = users
            .entry(id.as_i64())
            .or_insert_with(|| UserRecord::new(id, display_name, now));
        if record.display_name != display_name {
            record.display_name = display_name.to_string();
        }
        Ok(record.clone())
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        Ok(self.users.lock().unwrap().len() as u64)
    }

    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }
}

impl VerificationLedger for MemoryUserStore {
    fn is_verified(&self, user: UserId) -> Result<bool, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&user.as_i64())
            .map(|r| r.verified)
            .unwrap_or(false))
    }

    fn set_verified(&self, user: UserId) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        let record = users
            .get_mut(&user.as_i64())
            .ok_or_else(|| StoreError::NotFound(format!("user {user}")))?;
        if record.verified {
            return Ok(false);
        }
        record.verified = true;
        Ok(true)
    }
}

impl ReferralLedger for MemoryUserStore {
    fn record_referrer_if_absent(
        &self,
        user: UserId,
        referrer: UserId,
    ) -> Result<bool, StoreError> {
        if user == referrer {
            return Ok(false);
        }
        let mut users = self.users.lock().unwrap();
        let record = users
            .get_mut(&user.as_i64())
            .ok_or_else(|| StoreError::NotFound(format!("user {user}")))?;
        if record.referred_by.is_some() {
            return Ok(false);
        }
        record.referred_by = Some(referrer);
        Ok(true)
    }

    fn referrer_of(&self, user: UserId) -> Result<Option<UserId>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&user.as_i64())
            .and_then(|r| r.referred_by))
    }

    fn credit_reward(&self, referrer: UserId, amount: u64) -> Result<Option<u64>, StoreError> {
        let mut users = self.users.lock().unwrap();
        let Some(record) = users.get_mut(&referrer.as_i64()) else {
            return Ok(None);
        };
        record.balance = record.balance.saturating_add(amount);
        Ok(Some(record.balance))
    }
}

/// An in-memory text store for testing.
pub struct MemoryTextStore {
    texts: Mutex<HashMap<String, String>>,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self {
            texts: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryTextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStore for MemoryTextStore {
    fn get_text(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.texts.lock().unwrap().get(key).cloned())
    }

    fn set_text(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.texts
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// An in-memory required-channel store for testing.
///
/// Kept sorted so listings come back in the same order as the LMDB store.
pub struct MemoryChannelStore {
    channels: Mutex<BTreeSet<String>>,
}

impl MemoryChannelStore {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn with_channels(channels: Vec<ChannelId>) -> Self {
        let store = Self::new();
        {
            let mut set = store.channels.lock().unwrap();
            for channel in channels {
                set.insert(channel.as_str().to_string());
            }
        }
        store
    }
}

impl Default for MemoryChannelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelStore for MemoryChannelStore {
    fn add_channel(&self, channel: &ChannelId) -> Result<bool, StoreError> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .insert(channel.as_str().to_string()))
    }

    fn remove_channel(&self, channel: &ChannelId) -> Result<bool, StoreError> {
        Ok(self.channels.lock().unwrap().remove(channel.as_str()))
    }

    fn required_channels(&self) -> Result<Vec<ChannelId>, StoreError> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .iter()
            .map(ChannelId::new)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    #[test]
    fn test_ensure_then_get_user() {
        let store = MemoryUserStore::new();
        store.ensure_user(ALICE, "Alice", Timestamp::new(10)).unwrap();
        let record = store.get_user(ALICE).unwrap().unwrap();
        assert_eq!(record.display_name, "Alice");
        assert_eq!(record.created_at, Timestamp::new(10));
    }

    #[test]
    fn test_ensure_refreshes_display_name_only() {
        let store = MemoryUserStore::new();
        store.ensure_user(ALICE, "Alice", Timestamp::new(10)).unwrap();
        store.set_verified(ALICE).unwrap();

        let record = store.ensure_user(ALICE, "Alicia", Timestamp::new(99)).unwrap();
        assert_eq!(record.display_name, "Alicia");
        assert!(record.verified);
        assert_eq!(record.created_at, Timestamp::new(10));
    }

    #[test]
    fn test_set_verified_reports_the_transition_once() {
        let store = MemoryUserStore::new();
        store.ensure_user(ALICE, "Alice", Timestamp::new(10)).unwrap();
        assert!(store.set_verified(ALICE).unwrap());
        assert!(!store.set_verified(ALICE).unwrap());
    }

    #[test]
    fn test_set_verified_unknown_user_errors() {
        let store = MemoryUserStore::new();
        assert!(store.set_verified(ALICE).is_err());
    }

    #[test]
    fn test_referrer_first_writer_wins_and_no_self_referral() {
        let store = MemoryUserStore::new();
        store.ensure_user(ALICE, "Alice", Timestamp::new(10)).unwrap();

        assert!(!store.record_referrer_if_absent(ALICE, ALICE).unwrap());
        assert!(store.record_referrer_if_absent(ALICE, BOB).unwrap());
        assert!(!store
            .record_referrer_if_absent(ALICE, UserId::new(3))
            .unwrap());
        assert_eq!(store.referrer_of(ALICE).unwrap(), Some(BOB));
    }

    #[test]
    fn test_credit_reward_unknown_referrer_is_a_no_op() {
        let store = MemoryUserStore::new();
        assert_eq!(store.credit_reward(BOB, 10).unwrap(), None);

        store.ensure_user(BOB, "Bob", Timestamp::new(10)).unwrap();
        assert_eq!(store.credit_reward(BOB, 10).unwrap(), Some(10));
        assert_eq!(store.credit_reward(BOB, 5).unwrap(), Some(15));
    }

    #[test]
    fn test_channel_add_remove_list() {
        let store = MemoryChannelStore::new();
        assert!(store.add_channel(&ChannelId::new("@news")).unwrap());
        assert!(!store.add_channel(&ChannelId::new("@news")).unwrap());
        assert!(store.add_channel(&ChannelId::new("@announcements")).unwrap());

        let listed = store.required_channels().unwrap();
        assert_eq!(
            listed,
            vec![ChannelId::new("@announcements"), ChannelId::new("@news")]
        );

        assert!(store.remove_channel(&ChannelId::new("@news")).unwrap());
        assert!(!store.remove_channel(&ChannelId::new("@news")).unwrap());
    }

    #[test]
    fn test_text_store_set_then_get() {
        let store = MemoryTextStore::new();
        assert_eq!(store.get_text("greeting").unwrap(), None);
        store.set_text("greeting", "hello").unwrap();
        assert_eq!(store.get_text("greeting").unwrap().as_deref(), Some("hello"));
    }
}
