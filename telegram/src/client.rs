//! HTTP client for the Telegram Bot API.
//!
//! One reusable [`reqwest::Client`] per bot, POSTing JSON bodies to
//! `<base>/bot<token>/<method>`. Every call unwraps the `ok`/`result`
//! envelope and surfaces `ok: false` answers as [`TelegramError::Api`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use gatebot_types::{ChannelId, ChatId, UserId};

use crate::api::{
    AnswerCallbackQueryRequest, ApiResponse, ChatMember, GetChatMemberRequest, GetUpdatesRequest,
    InlineKeyboard, SendMessageRequest, Update, User,
};
use crate::{SubscriptionProbe, TelegramError, Transport};

/// Default Bot API server.
const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Request timeout for ordinary method calls.
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack added on top of the long-poll hold time so the server side of
/// `getUpdates` always wins the race against the HTTP timeout.
const LONG_POLL_SLACK: Duration = Duration::from_secs(10);

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

pub struct TelegramClient {
    /// Base URL of the Bot API server.
    base_url: String,
    token: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
}

impl TelegramClient {
    /// Create a client against the official Bot API server.
    pub fn new(token: &str) -> Self {
        Self::with_base_url(TELEGRAM_API_URL, token)
    }

    /// Create a client against a custom Bot API server.
    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T, R>(&self, method: &str, body: &T, timeout: Duration) -> Result<R, TelegramError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.method_url(method))
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TelegramError::Http(e.to_string()))?;

        // Error answers come back as non-2xx with an `ok: false` JSON body;
        // parse the envelope either way so the description survives.
        let api: ApiResponse<R> = resp
            .json()
            .await
            .map_err(|e| TelegramError::MalformedResponse(e.to_string()))?;

        if !api.ok {
            return Err(TelegramError::Api {
                code: api.error_code.unwrap_or(0),
                description: api
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        api.result
            .ok_or_else(|| TelegramError::MalformedResponse(format!("{method}: ok without result")))
    }

    /// Fetch the bot's own account, used at startup to confirm the token.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({}), CALL_TIMEOUT).await
    }

    /// Long-poll for updates past `offset`, holding up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call(
            "getUpdates",
            &body,
            Duration::from_secs(timeout_secs) + LONG_POLL_SLACK,
        )
        .await
    }

    pub async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id: chat.as_i64(),
            text,
            reply_markup: None,
        };
        self.call::<_, serde_json::Value>("sendMessage", &body, CALL_TIMEOUT)
            .await?;
        Ok(())
    }

    pub async fn send_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id: chat.as_i64(),
            text,
            reply_markup: Some(keyboard),
        };
        self.call::<_, serde_json::Value>("sendMessage", &body, CALL_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Acknowledge a button press so the client stops showing a spinner.
    pub async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError> {
        let body = AnswerCallbackQueryRequest {
            callback_query_id: callback_id,
            text,
        };
        self.call::<_, serde_json::Value>("answerCallbackQuery", &body, CALL_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Membership status of `user` in `channel`.
    ///
    /// The bot must be an administrator of the channel, otherwise the API
    /// refuses the lookup.
    pub async fn get_chat_member(
        &self,
        channel: &ChannelId,
        user: UserId,
    ) -> Result<ChatMember, TelegramError> {
        let body = GetChatMemberRequest {
            chat_id: channel.as_str(),
            user_id: user.as_i64(),
        };
        self.call("getChatMember", &body, CALL_TIMEOUT).await
    }
}

#[async_trait::async_trait]
impl Transport for TelegramClient {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), TelegramError> {
        self.send_text(chat, text).await
    }

    async fn send_message_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError> {
        self.send_with_keyboard(chat, text, keyboard).await
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError> {
        self.answer_callback_query(callback_id, text).await
    }
}

#[async_trait::async_trait]
impl SubscriptionProbe for TelegramClient {
    async fn unmet_channels(&self, user: UserId, required: &[ChannelId]) -> Vec<ChannelId> {
        let mut unmet = Vec::new();
        for channel in required {
            match self.get_chat_member(channel, user).await {
                Ok(member) if member.is_subscribed() => {}
                Ok(member) => {
                    tracing::debug!(%user, channel = channel.as_str(), status = %member.status, "not subscribed");
                    unmet.push(channel.clone());
                }
                // Fail closed: an unanswerable probe counts as unmet.
                Err(err) => {
                    tracing::warn!(%user, channel = channel.as_str(), %err, "membership probe failed");
                    unmet.push(channel.clone());
                }
            }
        }
        unmet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_creation() {
        let client = TelegramClient::new("123:abc");
        assert_eq!(client.base_url, TELEGRAM_API_URL);
    }

    #[test]
    fn test_custom_base_url_is_trimmed() {
        let client = TelegramClient::with_base_url("https://tg.example.com/", "123:abc");
        assert_eq!(client.base_url, "https://tg.example.com");
    }

    #[test]
    fn test_method_url_embeds_token() {
        let client = TelegramClient::with_base_url("https://tg.example.com", "123:abc");
        assert_eq!(
            client.method_url("getMe"),
            "https://tg.example.com/bot123:abc/getMe"
        );
    }
}
