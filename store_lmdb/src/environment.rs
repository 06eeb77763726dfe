//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::channels::LmdbChannelStore;
use crate::texts::LmdbTextStore;
use crate::user::LmdbUserStore;
use crate::LmdbError;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    users_db: Database<Bytes, Bytes>,
    texts_db: Database<Bytes, Bytes>,
    channels_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("create {}: {e}", path.display())))?;

        // Safety: nothing else opens this environment with different options.
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(max_dbs)
                .map_size(map_size)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let users_db = env.create_database(&mut wtxn, Some("users"))?;
        let texts_db = env.create_database(&mut wtxn, Some("texts"))?;
        let channels_db = env.create_database(&mut wtxn, Some("channels"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            users_db,
            texts_db,
            channels_db,
        })
    }

    pub fn user_store(&self) -> LmdbUserStore {
        LmdbUserStore {
            env: Arc::clone(&self.env),
            users_db: self.users_db,
        }
    }

    pub fn text_store(&self) -> LmdbTextStore {
        LmdbTextStore {
            env: Arc::clone(&self.env),
            texts_db: self.texts_db,
        }
    }

    pub fn channel_store(&self) -> LmdbChannelStore {
        LmdbChannelStore {
            env: Arc::clone(&self.env),
            channels_db: self.channels_db,
        }
    }
}
