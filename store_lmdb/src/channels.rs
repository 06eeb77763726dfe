//! LMDB implementation of the required-channel store.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use gatebot_store::{ChannelStore, StoreError};
use gatebot_types::ChannelId;

use crate::LmdbError;

pub struct LmdbChannelStore {
    pub(crate) env: Arc<Env>,
    pub(crate) channels_db: Database<Bytes, Bytes>,
}

impl ChannelStore for LmdbChannelStore {
    fn add_channel(&self, channel: &ChannelId) -> Result<bool, StoreError> {
        let key = channel.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let already = self
            .channels_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some();
        if already {
            return Ok(false);
        }
        self.channels_db
            .put(&mut wtxn, key, &[])
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn remove_channel(&self, channel: &ChannelId) -> Result<bool, StoreError> {
        let key = channel.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let removed = self
            .channels_db
            .delete(&mut wtxn, key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(removed)
    }

    fn required_channels(&self) -> Result<Vec<ChannelId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.channels_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut channels = Vec::new();
        for entry in iter {
            let (key, _) = entry.map_err(LmdbError::from)?;
            let id = std::str::from_utf8(key)
                .map_err(|e| StoreError::Corruption(format!("channel key: {e}")))?;
            channels.push(ChannelId::new(id));
        }
        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_env() -> (crate::LmdbEnvironment, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let env = crate::LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        (env, dir)
    }

    #[test]
    fn add_is_idempotent_on_membership() {
        let (env, _dir) = open_test_env();
        let store = env.channel_store();
        let ch = ChannelId::new("@updates");

        assert!(store.add_channel(&ch).unwrap());
        assert!(!store.add_channel(&ch).unwrap());
        assert_eq!(store.required_channels().unwrap(), vec![ch]);
    }

    #[test]
    fn remove_reports_presence() {
        let (env, _dir) = open_test_env();
        let store = env.channel_store();
        let ch = ChannelId::new("@updates");

        assert!(!store.remove_channel(&ch).unwrap());
        store.add_channel(&ch).unwrap();
        assert!(store.remove_channel(&ch).unwrap());
        assert!(store.required_channels().unwrap().is_empty());
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (env, _dir) = open_test_env();
        let store = env.channel_store();
        assert!(store.required_channels().unwrap().is_empty());
    }
}
