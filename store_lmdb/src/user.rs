//! LMDB implementation of the user store and both ledgers.
//!
//! One record per user, bincode-encoded under the big-endian user id.
//! Every mutation is a read-modify-write inside a single write transaction,
//! so concurrent callers can never observe a half-applied record.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use gatebot_store::user::{UserRecord, UserStore};
use gatebot_store::{ReferralLedger, StoreError, VerificationLedger};
use gatebot_types::{Timestamp, UserId};

use crate::LmdbError;

pub struct LmdbUserStore {
    pub(crate) env: Arc<Env>,
    pub(crate) users_db: Database<Bytes, Bytes>,
}

fn encode_user(record: &UserRecord) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode_user(bytes: &[u8]) -> Result<UserRecord, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Corruption(format!("user record: {e}")))
}

impl LmdbUserStore {
    /// Load a record inside an already-open transaction, copied out so the
    /// transaction borrow ends with this call.
    fn load(
        &self,
        txn: &heed::RoTxn<'_>,
        id: UserId,
    ) -> Result<Option<UserRecord>, StoreError> {
        match self.users_db.get(txn, &id.to_be_bytes()).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(decode_user(bytes)?)),
            None => Ok(None),
        }
    }
}

impl UserStore for LmdbUserStore {
    fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.load(&rtxn, id)
    }

    fn ensure_user(
        &self,
        id: UserId,
        display_name: &str,
        now: Timestamp,
    ) -> Result<UserRecord, StoreError> {
        let key = id.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existing = self.load(&wtxn, id)?;
        let record = match existing {
            Some(mut record) => {
                if record.display_name != display_name {
                    record.display_name = display_name.to_string();
                    let val = encode_user(&record)?;
                    self.users_db
                        .put(&mut wtxn, &key, &val)
                        .map_err(LmdbError::from)?;
                }
                record
            }
            None => {
                let record = UserRecord::new(id, display_name, now);
                let val = encode_user(&record)?;
                self.users_db
                    .put(&mut wtxn, &key, &val)
                    .map_err(LmdbError::from)?;
                record
            }
        };
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(record)
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.users_db.len(&rtxn).map_err(|e| LmdbError::from(e).into())
    }

    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.users_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut users = Vec::new();
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            users.push(decode_user(val)?);
        }
        Ok(users)
    }
}

impl VerificationLedger for LmdbUserStore {
    fn is_verified(&self, user: UserId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.load(&rtxn, user)?.map(|r| r.verified).unwrap_or(false))
    }

    fn set_verified(&self, user: UserId) -> Result<bool, StoreError> {
        let key = user.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut record = self
            .load(&wtxn, user)?
            .ok_or_else(|| StoreError::NotFound(format!("user {user}")))?;
        if record.verified {
            return Ok(false);
        }
        record.verified = true;
        let val = encode_user(&record)?;
        self.users_db
            .put(&mut wtxn, &key, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }
}

impl ReferralLedger for LmdbUserStore {
    fn record_referrer_if_absent(
        &self,
        user: UserId,
        referrer: UserId,
    ) -> Result<bool, StoreError> {
        if user == referrer {
            return Ok(false);
        }
        let key = user.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut record = self
            .load(&wtxn, user)?
            .ok_or_else(|| StoreError::NotFound(format!("user {user}")))?;
        if record.referred_by.is_some() {
            return Ok(false);
        }
        record.referred_by = Some(referrer);
        let val = encode_user(&record)?;
        self.users_db
            .put(&mut wtxn, &key, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn referrer_of(&self, user: UserId) -> Result<Option<UserId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.load(&rtxn, user)?.and_then(|r| r.referred_by))
    }

    fn credit_reward(&self, referrer: UserId, amount: u64) -> Result<Option<u64>, StoreError> {
        let key = referrer.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let Some(mut record) = self.load(&wtxn, referrer)? else {
            return Ok(None);
        };
        record.balance = record.balance.saturating_add(amount);
        let val = encode_user(&record)?;
        self.users_db
            .put(&mut wtxn, &key, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(Some(record.balance))
    }
}
