//! Update routing: turns long-poll updates into gate calls and replies.
//!
//! One dispatcher per bot. Updates arrive one at a time from the poll loop;
//! the gate sits behind a mutex so callback and message handling never
//! interleave a user's entry flow. The subscription probe runs outside the
//! gate lock, between `begin_entry` and `complete_entry`.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use gatebot_assistant::Assistant;
use gatebot_gate::{AccessGate, EntryOutcome, EntryStage, GateEvent, ResponseOutcome};
use gatebot_store::{ChannelStore, UserStore};
use gatebot_telegram::api::{CallbackQuery, Message, User};
use gatebot_telegram::{
    InlineKeyboard, InlineKeyboardButton, SubscriptionProbe, Transport, Update,
};
use gatebot_types::{ChannelId, ChatId, Timestamp, UserId};

use crate::admin::{split_command, AdminAction, AdminOps};
use crate::error::BotError;
use crate::metrics::BotMetrics;
use crate::texts::{TextCatalog, TextKey};

/// Callback payload of the "I have joined" button.
const CHECK_SUBSCRIPTION: &str = "check_subscription";

pub struct Dispatcher {
    gate: Mutex<AccessGate>,
    users: Arc<dyn UserStore + Send + Sync>,
    channels: Arc<dyn ChannelStore + Send + Sync>,
    texts: Arc<TextCatalog>,
    transport: Arc<dyn Transport>,
    probe: Arc<dyn SubscriptionProbe>,
    assistant: Option<Arc<dyn Assistant>>,
    admin: AdminOps,
    metrics: Arc<BotMetrics>,
    /// Resolved via `getMe` at startup when the config leaves it empty.
    bot_username: RwLock<String>,
    leaderboard_size: usize,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gate: AccessGate,
        users: Arc<dyn UserStore + Send + Sync>,
        channels: Arc<dyn ChannelStore + Send + Sync>,
        texts: Arc<TextCatalog>,
        transport: Arc<dyn Transport>,
        probe: Arc<dyn SubscriptionProbe>,
        assistant: Option<Arc<dyn Assistant>>,
        admin: AdminOps,
        metrics: Arc<BotMetrics>,
        bot_username: String,
    ) -> Self {
        let leaderboard_size = gate.params().leaderboard_size;
        Self {
            gate: Mutex::new(gate),
            users,
            channels,
            texts,
            transport,
            probe,
            assistant,
            admin,
            metrics,
            bot_username: RwLock::new(bot_username),
            leaderboard_size,
        }
    }

    pub fn set_bot_username(&self, username: &str) {
        *self.bot_username.write().expect("bot_username lock poisoned") = username.to_string();
    }

    /// Route one update. Errors are per-update; the poll loop logs them and
    /// keeps going.
    pub async fn handle_update(&self, update: Update) -> Result<(), BotError> {
        if let Some(message) = update.message {
            self.handle_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await
        } else {
            Ok(())
        }
    }

    /// Update the user-count gauges from the store.
    pub fn refresh_gauges(&self) {
        if let Ok(count) = self.users.user_count() {
            self.metrics.known_users.set(count as i64);
        }
        if let Ok(count) = self.users.verified_count() {
            self.metrics.verified_users.set(count as i64);
        }
    }

    // ── Message routing ─────────────────────────────────────────────────

    async fn handle_message(&self, message: Message) -> Result<(), BotError> {
        let chat = ChatId::new(message.chat.id);
        // The bot only talks in direct messages; group traffic is ignored.
        if !chat.is_private() {
            return Ok(());
        }
        let Some(from) = message.from else {
            return Ok(());
        };
        if from.is_bot {
            return Ok(());
        }
        let Some(text) = message.text else {
            return Ok(());
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let user = UserId::new(from.id);

        if text.starts_with('/') {
            self.metrics.commands_handled.inc();
            return self.handle_command(user, &from, chat, text).await;
        }
        if self.gate.lock().await.has_pending(user) {
            return self.handle_answer(user, chat, text).await;
        }
        self.handle_free_text(chat, text).await
    }

    async fn handle_command(
        &self,
        user: UserId,
        from: &User,
        chat: ChatId,
        text: &str,
    ) -> Result<(), BotError> {
        let (command, args) = split_command(text);
        match command {
            "/start" => {
                let referrer = parse_referral_payload(args);
                self.run_entry(user, &from.display_name(), chat, referrer)
                    .await
            }
            "/profile" => self.send_profile(user, chat).await,
            "/leaderboard" => self.send_leaderboard(chat).await,
            "/help" => {
                self.send_text_key(chat, TextKey::Help, &[]).await;
                Ok(())
            }
            _ => match self.admin.try_handle(user, chat, text).await? {
                AdminAction::Handled | AdminAction::Denied => Ok(()),
                AdminAction::NotAdminCommand => {
                    self.send_text_key(chat, TextKey::Unknown, &[]).await;
                    Ok(())
                }
            },
        }
    }

    // ── Entry flow ──────────────────────────────────────────────────────

    /// The two-phase entry: lockout and referral bookkeeping, then the
    /// subscription probe (no gate lock held), then the outcome.
    async fn run_entry(
        &self,
        user: UserId,
        display_name: &str,
        chat: ChatId,
        referrer: Option<UserId>,
    ) -> Result<(), BotError> {
        let now = Timestamp::now();
        let stage = self
            .gate
            .lock()
            .await
            .begin_entry(user, display_name, referrer, now)?;

        match stage {
            EntryStage::Locked { remaining_secs } => {
                self.send_text_key(
                    chat,
                    TextKey::LockedOut,
                    &[("seconds", remaining_secs.to_string())],
                )
                .await;
            }
            EntryStage::Proceed => {
                let required = self.channels.required_channels()?;
                let unmet = if required.is_empty() {
                    Vec::new()
                } else {
                    self.probe.unmet_channels(user, &required).await
                };

                let outcome = self.gate.lock().await.complete_entry(user, unmet, now)?;
                match outcome {
                    EntryOutcome::Unsubscribed { unmet } => {
                        self.send_subscription_prompt(chat, &unmet).await;
                    }
                    EntryOutcome::AlreadyVerified => {
                        let link = self.referral_link(user);
                        self.send_text_key(chat, TextKey::AlreadyVerified, &[("link", link)])
                            .await;
                    }
                    EntryOutcome::ChallengeIssued { challenge } => {
                        self.send_text_key(
                            chat,
                            TextKey::CaptchaPrompt,
                            &[("challenge", challenge.prompt())],
                        )
                        .await;
                    }
                }
            }
        }

        self.drain_gate_events().await;
        Ok(())
    }

    async fn send_subscription_prompt(&self, chat: ChatId, unmet: &[ChannelId]) {
        let mut keyboard = InlineKeyboard::default();
        for channel in unmet {
            if let Some(url) = channel.join_url() {
                keyboard = keyboard.row(vec![InlineKeyboardButton::link(
                    format!("Join {}", channel.as_str()),
                    url,
                )]);
            }
        }
        keyboard = keyboard.row(vec![InlineKeyboardButton::callback(
            "I have joined",
            CHECK_SUBSCRIPTION,
        )]);

        let text = self.texts.render(TextKey::NotSubscribed, &[]);
        match self
            .transport
            .send_message_with_keyboard(chat, &text, &keyboard)
            .await
        {
            Ok(()) => self.metrics.messages_sent.inc(),
            Err(err) => {
                tracing::warn!(%chat, %err, "send failed");
                self.metrics.send_failures.inc();
            }
        }
    }

    // ── Challenge answers ───────────────────────────────────────────────

    async fn handle_answer(&self, user: UserId, chat: ChatId, text: &str) -> Result<(), BotError> {
        let now = Timestamp::now();
        let outcome = self.gate.lock().await.on_response(user, text, now)?;

        match outcome {
            ResponseOutcome::Verified { .. } => {
                let link = self.referral_link(user);
                self.send_text_key(chat, TextKey::Verified, &[("link", link)])
                    .await;
            }
            ResponseOutcome::WrongAnswer { locked_for_secs } => {
                self.send_text_key(
                    chat,
                    TextKey::WrongAnswer,
                    &[("seconds", locked_for_secs.to_string())],
                )
                .await;
            }
            ResponseOutcome::Malformed => {
                let prompt = self
                    .gate
                    .lock()
                    .await
                    .pending_challenge(user)
                    .map(|challenge| challenge.prompt())
                    .unwrap_or_default();
                self.send_text_key(chat, TextKey::MalformedAnswer, &[("challenge", prompt)])
                    .await;
            }
            ResponseOutcome::Expired => {
                self.send_text_key(chat, TextKey::Expired, &[]).await;
            }
        }

        self.drain_gate_events().await;
        Ok(())
    }

    // ── Callback queries ────────────────────────────────────────────────

    async fn handle_callback(&self, callback: CallbackQuery) -> Result<(), BotError> {
        if let Err(err) = self.transport.answer_callback(&callback.id, None).await {
            tracing::debug!(%err, "answer_callback failed");
        }
        if callback.data.as_deref() != Some(CHECK_SUBSCRIPTION) {
            return Ok(());
        }

        let user = UserId::new(callback.from.id);
        let chat = callback
            .message
            .as_ref()
            .map(|m| ChatId::new(m.chat.id))
            .unwrap_or_else(|| ChatId::from(user));
        if !chat.is_private() {
            return Ok(());
        }
        // Re-run the entry; the referral (if any) was recorded on /start.
        self.run_entry(user, &callback.from.display_name(), chat, None)
            .await
    }

    // ── Profile and leaderboard ─────────────────────────────────────────

    async fn send_profile(&self, user: UserId, chat: ChatId) -> Result<(), BotError> {
        let Some(record) = self.users.get_user(user)? else {
            self.send_text_key(chat, TextKey::Help, &[]).await;
            return Ok(());
        };
        let referrals = self.users.referral_count(user)?;
        let link = self.referral_link(user);
        self.send_text_key(
            chat,
            TextKey::Profile,
            &[
                ("name", record.display_name),
                ("balance", record.balance.to_string()),
                ("referrals", referrals.to_string()),
                ("link", link),
            ],
        )
        .await;
        Ok(())
    }

    async fn send_leaderboard(&self, chat: ChatId) -> Result<(), BotError> {
        let top = self.users.top_by_balance(self.leaderboard_size)?;
        if top.is_empty() {
            self.send_text_key(chat, TextKey::LeaderboardEmpty, &[]).await;
            return Ok(());
        }

        let mut lines = vec![self.texts.get(TextKey::LeaderboardHeader)];
        for (i, record) in top.iter().enumerate() {
            lines.push(format!(
                "{}. {}: {}",
                i + 1,
                record.display_name,
                record.balance
            ));
        }
        self.send(chat, &lines.join("\n")).await;
        Ok(())
    }

    // ── Free-form messages ──────────────────────────────────────────────

    async fn handle_free_text(&self, chat: ChatId, text: &str) -> Result<(), BotError> {
        match &self.assistant {
            Some(assistant) => match assistant.reply(text).await {
                Ok(reply) => {
                    self.metrics.assistant_replies.inc();
                    self.send(chat, &reply).await;
                }
                Err(err) => {
                    tracing::warn!(%err, "assistant call failed");
                    self.metrics.assistant_failures.inc();
                    self.send_text_key(chat, TextKey::AssistantUnavailable, &[])
                        .await;
                }
            },
            None => {
                self.send_text_key(chat, TextKey::Unknown, &[]).await;
            }
        }
        Ok(())
    }

    // ── Gate events ─────────────────────────────────────────────────────

    async fn drain_gate_events(&self) {
        let events = self.gate.lock().await.drain_events();
        for event in events {
            match event {
                GateEvent::ReferralRecorded { user, referrer } => {
                    tracing::info!(%user, %referrer, "referral recorded");
                }
                GateEvent::ChallengeIssued { user } => {
                    tracing::debug!(%user, "challenge issued");
                    self.metrics.challenges_issued.inc();
                }
                GateEvent::UserVerified { user } => {
                    tracing::info!(%user, "user verified");
                    self.metrics.verifications.inc();
                }
                GateEvent::RewardCredited {
                    referrer,
                    referred,
                    amount,
                } => {
                    tracing::info!(%referrer, %referred, amount, "referral reward credited");
                    self.metrics.rewards_credited.inc();
                    self.send_reward_notice(referrer, referred, amount).await;
                }
                GateEvent::LockoutArmed { user, unblock_at } => {
                    tracing::info!(%user, unblock_at = unblock_at.as_secs(), "lockout armed");
                    self.metrics.lockouts_armed.inc();
                }
            }
        }
    }

    async fn send_reward_notice(&self, referrer: UserId, referred: UserId, amount: u64) {
        let name = match self.users.get_user(referred) {
            Ok(Some(record)) => record.display_name,
            _ => referred.to_string(),
        };
        let balance = match self.users.get_user(referrer) {
            Ok(Some(record)) => record.balance.to_string(),
            _ => "?".to_string(),
        };
        let text = self.texts.render(
            TextKey::RewardNotice,
            &[
                ("name", name),
                ("amount", amount.to_string()),
                ("balance", balance),
            ],
        );
        self.send(ChatId::from(referrer), &text).await;
    }

    // ── Outbound helpers ────────────────────────────────────────────────

    fn referral_link(&self, user: UserId) -> String {
        let username = self.bot_username.read().expect("bot_username lock poisoned");
        format!("https://t.me/{username}?start=ref_{user}")
    }

    async fn send_text_key(&self, chat: ChatId, key: TextKey, args: &[(&str, String)]) {
        let text = self.texts.render(key, args);
        self.send(chat, &text).await;
    }

    /// Delivery failures are logged and dropped; the gate state stands.
    async fn send(&self, chat: ChatId, text: &str) {
        match self.transport.send_message(chat, text).await {
            Ok(()) => self.metrics.messages_sent.inc(),
            Err(err) => {
                tracing::warn!(%chat, %err, "send failed");
                self.metrics.send_failures.inc();
            }
        }
    }
}

/// Parse a `/start` deep-link payload into a referrer id.
///
/// Accepts `ref_<id>` (the links the bot hands out) and a bare numeric id.
fn parse_referral_payload(payload: &str) -> Option<UserId> {
    let payload = payload.trim();
    let raw = payload.strip_prefix("ref_").unwrap_or(payload);
    raw.parse::<i64>().ok().filter(|id| *id > 0).map(UserId::new)
}
