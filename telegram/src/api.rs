//! Bot API wire types: the subset of the Telegram JSON surface the bot
//! actually touches, plus the request bodies it sends.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method call answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "none")]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

// `#[serde(default)]` alone requires `T: Default`; route through a helper.
fn none<T>() -> Option<T> {
    None
}

/// A Telegram user or bot account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Name shown to other users, composed from first and last name.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// The chat a message was posted in.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// `private`, `group`, `supergroup`, or `channel`.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

/// An inline-keyboard button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// One long-poll update. Exactly one of the payload fields is set.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// Answer to `getChatMember`, reduced to the membership status.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub status: String,
}

impl ChatMember {
    /// Whether this status counts as subscribed to the channel.
    ///
    /// `left` and `kicked` do not; `restricted` still holds membership but
    /// is treated as unsubscribed to match what users see in the channel.
    pub fn is_subscribed(&self) -> bool {
        matches!(self.status.as_str(), "member" | "administrator" | "creator")
    }
}

/// One button of an inline keyboard. Exactly one action field is set.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }

    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }
}

/// Rows of inline buttons attached below a message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboard {
    pub fn row(mut self, buttons: Vec<InlineKeyboardButton>) -> Self {
        self.inline_keyboard.push(buttons);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboard>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerCallbackQueryRequest<'a> {
    pub callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub(crate) struct GetChatMemberRequest<'a> {
    pub chat_id: &'a str,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_message_update() {
        let json = r#"{
            "update_id": 7,
            "message": {
                "message_id": 42,
                "from": {"id": 100, "is_bot": false, "first_name": "Ada"},
                "chat": {"id": 100, "type": "private"},
                "text": "/start"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 7);
        let message = update.message.unwrap();
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(message.chat.kind, "private");
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_deserialize_callback_update() {
        let json = r#"{
            "update_id": 8,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 100, "is_bot": false, "first_name": "Ada"},
                "data": "check_subscription"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let callback = update.callback_query.unwrap();
        assert_eq!(callback.data.as_deref(), Some("check_subscription"));
    }

    #[test]
    fn test_deserialize_error_response() {
        let json = r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user"}"#;
        let resp: ApiResponse<Message> = serde_json::from_str(json).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error_code, Some(403));
        assert!(resp.result.is_none());
    }

    #[test]
    fn test_display_name_composition() {
        let json = r#"{"id": 1, "is_bot": false, "first_name": "Ada", "last_name": "Lovelace"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name(), "Ada Lovelace");

        let json = r#"{"id": 2, "is_bot": false, "first_name": "Ada"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn test_subscribed_statuses() {
        for status in ["member", "administrator", "creator"] {
            let member = ChatMember {
                status: status.into(),
            };
            assert!(member.is_subscribed(), "{status} must count as subscribed");
        }
        for status in ["left", "kicked", "restricted"] {
            let member = ChatMember {
                status: status.into(),
            };
            assert!(!member.is_subscribed(), "{status} must not count as subscribed");
        }
    }

    #[test]
    fn test_keyboard_serialization_omits_unset_actions() {
        let keyboard = InlineKeyboard::default()
            .row(vec![InlineKeyboardButton::link("Join", "https://t.me/news")])
            .row(vec![InlineKeyboardButton::callback("Done", "check_subscription")]);

        let value = serde_json::to_value(&keyboard).unwrap();
        let rows = value["inline_keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0][0].get("callback_data").is_none());
        assert!(rows[1][0].get("url").is_none());
        assert_eq!(rows[1][0]["callback_data"], "check_subscription");
    }

    #[test]
    fn test_send_message_request_without_markup() {
        let request = SendMessageRequest {
            chat_id: 100,
            text: "hello",
            reply_markup: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("reply_markup").is_none());
    }
}
