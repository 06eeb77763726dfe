//! Nullable transport: record messages without sending them.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use gatebot_assistant::{Assistant, AssistantError};
use gatebot_telegram::{InlineKeyboard, SubscriptionProbe, TelegramError, Transport};
use gatebot_types::{ChannelId, ChatId, UserId};

/// A test transport that records outbound messages instead of sending them.
pub struct NullTransport {
    /// All messages "sent" by the bot, keyboard or not.
    sent: Mutex<Vec<(ChatId, String)>>,
    /// Keyboards attached to keyboard sends, in send order.
    keyboards: Mutex<Vec<(ChatId, InlineKeyboard)>>,
    /// Callback ids acknowledged so far.
    answered: Mutex<Vec<String>>,
    /// Chats whose sends fail, as a blocked user would.
    failing: Mutex<HashSet<i64>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            keyboards: Mutex::new(Vec::new()),
            answered: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make every send to `chat` fail from now on.
    pub fn fail_sends_to(&self, chat: ChatId) {
        self.failing.lock().unwrap().insert(chat.as_i64());
    }

    /// Get all sent messages (for assertions).
    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts sent to one chat, in order.
    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == chat)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn keyboards(&self) -> Vec<(ChatId, InlineKeyboard)> {
        self.keyboards.lock().unwrap().clone()
    }

    pub fn answered_callbacks(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }

    /// Clear all recorded traffic.
    pub fn reset(&self) {
        self.sent.lock().unwrap().clear();
        self.keyboards.lock().unwrap().clear();
        self.answered.lock().unwrap().clear();
    }

    fn record(&self, chat: ChatId, text: &str) -> Result<(), TelegramError> {
        if self.failing.lock().unwrap().contains(&chat.as_i64()) {
            return Err(TelegramError::Api {
                code: 403,
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push((chat, text.to_string()));
        Ok(())
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for NullTransport {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), TelegramError> {
        self.record(chat, text)
    }

    async fn send_message_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError> {
        self.record(chat, text)?;
        self.keyboards.lock().unwrap().push((chat, keyboard.clone()));
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        _text: Option<&str>,
    ) -> Result<(), TelegramError> {
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }
}

/// A subscription probe answering from a configured unmet set.
pub struct NullSubscriptionProbe {
    unmet: Mutex<Vec<ChannelId>>,
}

impl NullSubscriptionProbe {
    /// Create a probe where every user meets every requirement.
    pub fn all_met() -> Self {
        Self {
            unmet: Mutex::new(Vec::new()),
        }
    }

    /// Create a probe where the given channels read as unmet.
    pub fn with_unmet(channels: Vec<ChannelId>) -> Self {
        Self {
            unmet: Mutex::new(channels),
        }
    }

    /// Change the unmet set, e.g. after the user "joins" a channel.
    pub fn set_unmet(&self, channels: Vec<ChannelId>) {
        *self.unmet.lock().unwrap() = channels;
    }
}

#[async_trait]
impl SubscriptionProbe for NullSubscriptionProbe {
    async fn unmet_channels(&self, _user: UserId, required: &[ChannelId]) -> Vec<ChannelId> {
        let unmet = self.unmet.lock().unwrap();
        required
            .iter()
            .filter(|channel| unmet.contains(channel))
            .cloned()
            .collect()
    }
}

/// A canned assistant.
pub struct NullAssistant {
    reply: Option<String>,
}

impl NullAssistant {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
        }
    }

    /// Fail every call, as an unreachable backend would.
    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl Assistant for NullAssistant {
    async fn reply(&self, _user_text: &str) -> Result<String, AssistantError> {
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(AssistantError::Http("connection refused".to_string())),
        }
    }
}
