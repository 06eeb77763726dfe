//! User-facing message catalog.
//!
//! Every message the bot sends is keyed, carries a built-in default, and can
//! be overwritten at runtime by an admin via `/set_text`. Overrides live in
//! the [`TextStore`]; lookups fall back to the default when unset or when
//! the store cannot be read. `{placeholders}` are substituted at send time.

use std::sync::Arc;

use gatebot_store::{StoreError, TextStore};

/// Keys of every customisable message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKey {
    CaptchaPrompt,
    MalformedAnswer,
    WrongAnswer,
    LockedOut,
    Expired,
    NotSubscribed,
    Verified,
    AlreadyVerified,
    RewardNotice,
    Profile,
    LeaderboardHeader,
    LeaderboardEmpty,
    Help,
    Unknown,
    AssistantUnavailable,
}

impl TextKey {
    pub const ALL: [TextKey; 15] = [
        TextKey::CaptchaPrompt,
        TextKey::MalformedAnswer,
        TextKey::WrongAnswer,
        TextKey::LockedOut,
        TextKey::Expired,
        TextKey::NotSubscribed,
        TextKey::Verified,
        TextKey::AlreadyVerified,
        TextKey::RewardNotice,
        TextKey::Profile,
        TextKey::LeaderboardHeader,
        TextKey::LeaderboardEmpty,
        TextKey::Help,
        TextKey::Unknown,
        TextKey::AssistantUnavailable,
    ];

    /// Storage key, also the name admins use with `/set_text`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKey::CaptchaPrompt => "captcha_prompt",
            TextKey::MalformedAnswer => "malformed_answer",
            TextKey::WrongAnswer => "wrong_answer",
            TextKey::LockedOut => "locked_out",
            TextKey::Expired => "expired",
            TextKey::NotSubscribed => "not_subscribed",
            TextKey::Verified => "verified",
            TextKey::AlreadyVerified => "already_verified",
            TextKey::RewardNotice => "reward_notice",
            TextKey::Profile => "profile",
            TextKey::LeaderboardHeader => "leaderboard_header",
            TextKey::LeaderboardEmpty => "leaderboard_empty",
            TextKey::Help => "help",
            TextKey::Unknown => "unknown",
            TextKey::AssistantUnavailable => "assistant_unavailable",
        }
    }

    pub fn from_key(key: &str) -> Option<TextKey> {
        TextKey::ALL.iter().copied().find(|k| k.as_str() == key)
    }

    /// Built-in default, used until an admin overrides the key.
    pub fn default_text(&self) -> &'static str {
        match self {
            TextKey::CaptchaPrompt => {
                "Welcome! To get access, solve this:\n{challenge}\nReply with the number."
            }
            TextKey::MalformedAnswer => "Please answer with just the number.\n{challenge}",
            TextKey::WrongAnswer => "Wrong answer. You can try again in {seconds} seconds.",
            TextKey::LockedOut => "Too many attempts. Try again in {seconds} seconds.",
            TextKey::Expired => "That challenge is no longer active. Send /start for a fresh one.",
            TextKey::NotSubscribed => {
                "To use this bot, join the required channels first, then tap the button below."
            }
            TextKey::Verified => {
                "Correct! You now have full access.\nShare your link to earn rewards: {link}"
            }
            TextKey::AlreadyVerified => "You are verified. Your referral link: {link}",
            TextKey::RewardNotice => {
                "{name} joined with your link. You earned {amount} points. Balance: {balance}."
            }
            TextKey::Profile => {
                "{name}\nBalance: {balance}\nReferrals: {referrals}\nYour link: {link}"
            }
            TextKey::LeaderboardHeader => "Top balances:",
            TextKey::LeaderboardEmpty => "Nobody has earned anything yet.",
            TextKey::Help => {
                "Send /start to verify and get your referral link.\n/profile shows your balance, /leaderboard the top earners."
            }
            TextKey::Unknown => "I did not understand that. Send /help for the commands.",
            TextKey::AssistantUnavailable => {
                "Sorry, I cannot answer right now. Please try again later."
            }
        }
    }
}

/// Catalog resolving keys through the store with built-in fallbacks.
pub struct TextCatalog {
    store: Arc<dyn TextStore + Send + Sync>,
}

impl TextCatalog {
    pub fn new(store: Arc<dyn TextStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// The current text for `key`: the stored override, or the default.
    pub fn get(&self, key: TextKey) -> String {
        match self.store.get_text(key.as_str()) {
            Ok(Some(text)) => text,
            Ok(None) => key.default_text().to_string(),
            Err(err) => {
                tracing::warn!(key = key.as_str(), %err, "text lookup failed, using default");
                key.default_text().to_string()
            }
        }
    }

    /// Resolve `key` and substitute `{name}` placeholders.
    pub fn render(&self, key: TextKey, args: &[(&str, String)]) -> String {
        let mut text = self.get(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    /// Store an override. `Ok(false)` means the key is not a known message.
    pub fn set(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        if TextKey::from_key(key).is_none() {
            return Ok(false);
        }
        self.store.set_text(key, value)?;
        Ok(true)
    }
}
