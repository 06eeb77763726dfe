//! LMDB implementation of the dynamic-text store.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use gatebot_store::{StoreError, TextStore};

use crate::LmdbError;

pub struct LmdbTextStore {
    pub(crate) env: Arc<Env>,
    pub(crate) texts_db: Database<Bytes, Bytes>,
}

impl TextStore for LmdbTextStore {
    fn get_text(&self, key: &str) -> Result<Option<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.texts_db.get(&rtxn, key.as_bytes()).map_err(LmdbError::from)? {
            Some(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| StoreError::Corruption(format!("text {key}: {e}")))?;
                Ok(Some(text.to_string()))
            }
            None => Ok(None),
        }
    }

    fn set_text(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.texts_db
            .put(&mut wtxn, key.as_bytes(), value.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
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
    fn unset_key_returns_none() {
        let (env, _dir) = open_test_env();
        let store = env.text_store();
        assert_eq!(store.get_text("welcome").unwrap(), None);
    }

    #[test]
    fn set_then_get_and_overwrite() {
        let (env, _dir) = open_test_env();
        let store = env.text_store();

        store.set_text("welcome", "Hello!").unwrap();
        assert_eq!(store.get_text("welcome").unwrap().as_deref(), Some("Hello!"));

        store.set_text("welcome", "Salom!").unwrap();
        assert_eq!(store.get_text("welcome").unwrap().as_deref(), Some("Salom!"));
    }
}
