//! Required-channel storage trait.

use crate::StoreError;
use gatebot_types::ChannelId;

/// Admin-managed list of channels the subscription gate enforces.
///
/// An empty list means the gate passes trivially.
pub trait ChannelStore {
    /// Returns `false` if the channel was already present.
    fn add_channel(&self, channel: &ChannelId) -> Result<bool, StoreError>;

    /// Returns `false` if the channel was not present.
    fn remove_channel(&self, channel: &ChannelId) -> Result<bool, StoreError>;

    fn required_channels(&self) -> Result<Vec<ChannelId>, StoreError>;
}
