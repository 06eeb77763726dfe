//! Telegram Bot API plumbing.
//!
//! The bot core talks to Telegram through two narrow traits so tests can
//! swap the wire out entirely:
//! - [`Transport`]: outbound messages and callback acknowledgements
//! - [`SubscriptionProbe`]: channel membership lookups, failing closed
//!
//! [`TelegramClient`] implements both over HTTPS long polling.

pub mod api;
pub mod client;
pub mod error;

pub use api::{InlineKeyboard, InlineKeyboardButton, Update};
pub use client::TelegramClient;
pub use error::TelegramError;

use async_trait::async_trait;
use gatebot_types::{ChannelId, ChatId, UserId};

/// Outbound side of the bot conversation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a plain text message to a chat.
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), TelegramError>;

    /// Send a text message with an inline keyboard attached.
    async fn send_message_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError>;

    /// Acknowledge an inline-button press.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError>;
}

/// Channel membership lookups for the subscription gate.
#[async_trait]
pub trait SubscriptionProbe: Send + Sync {
    /// Channels from `required` that `user` is not subscribed to.
    ///
    /// Probes that cannot be answered count as unmet, so an API outage
    /// can never wave users through the gate.
    async fn unmet_channels(&self, user: UserId, required: &[ChannelId]) -> Vec<ChannelId>;
}
