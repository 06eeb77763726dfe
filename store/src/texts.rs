//! Dynamic message-text storage trait.

use crate::StoreError;

/// Admin-editable message templates keyed by a short name.
///
/// Lookup returning `None` means "no override"; the bot layer falls back to
/// its built-in default for that key.
pub trait TextStore {
    fn get_text(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_text(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
