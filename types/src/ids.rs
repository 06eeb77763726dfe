//! Identifier newtypes for users, chats, and required channels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat-platform user identifier.
///
/// Opaque to the gate; the platform guarantees uniqueness and stability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Big-endian byte encoding, used as an ordered store key.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat identifier. Equal to the user id for private chats; groups and
/// channels use negative ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(i64);

impl ChatId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this chat is a private (one-on-one) chat.
    pub fn is_private(&self) -> bool {
        self.0 > 0
    }
}

impl From<UserId> for ChatId {
    fn from(user: UserId) -> Self {
        Self(user.as_i64())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A required-channel identifier as the platform accepts it: either an
/// `@username` handle or a numeric chat id rendered as a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A join link for `@username` channels; numeric ids have no public link.
    pub fn join_url(&self) -> Option<String> {
        self.0
            .strip_prefix('@')
            .map(|name| format!("https://t.me/{name}"))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ChannelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
