//! Admin command surface.
//!
//! Admin ids come from config. Commands from anyone else are dropped
//! without a reply or any state change, so the admin surface is invisible
//! to regular users.

use std::collections::HashSet;
use std::sync::Arc;

use gatebot_store::user::UserStore;
use gatebot_store::{ChannelStore, ReferralLedger};
use gatebot_telegram::Transport;
use gatebot_types::{ChannelId, ChatId, UserId};

use crate::broadcast;
use crate::error::BotError;
use crate::metrics::BotMetrics;
use crate::texts::{TextCatalog, TextKey};

/// How `AdminOps` disposed of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    /// Not an admin command; the dispatcher keeps routing it.
    NotAdminCommand,
    /// An admin command from a non-admin, dropped silently.
    Denied,
    /// Handled, reply already sent.
    Handled,
}

pub struct AdminOps {
    admin_ids: HashSet<i64>,
    users: Arc<dyn UserStore + Send + Sync>,
    referrals: Arc<dyn ReferralLedger + Send + Sync>,
    channels: Arc<dyn ChannelStore + Send + Sync>,
    texts: Arc<TextCatalog>,
    transport: Arc<dyn Transport>,
    metrics: Arc<BotMetrics>,
}

impl AdminOps {
    pub fn new(
        admin_ids: impl IntoIterator<Item = i64>,
        users: Arc<dyn UserStore + Send + Sync>,
        referrals: Arc<dyn ReferralLedger + Send + Sync>,
        channels: Arc<dyn ChannelStore + Send + Sync>,
        texts: Arc<TextCatalog>,
        transport: Arc<dyn Transport>,
        metrics: Arc<BotMetrics>,
    ) -> Self {
        Self {
            admin_ids: admin_ids.into_iter().collect(),
            users,
            referrals,
            channels,
            texts,
            transport,
            metrics,
        }
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.admin_ids.contains(&user.as_i64())
    }

    /// Route `text` if it is an admin command.
    pub async fn try_handle(
        &self,
        user: UserId,
        chat: ChatId,
        text: &str,
    ) -> Result<AdminAction, BotError> {
        let (command, args) = split_command(text);
        match command {
            "/grant" | "/stats" | "/broadcast" | "/set_text" | "/add_channel" | "/del_channel"
            | "/channels" => {}
            _ => return Ok(AdminAction::NotAdminCommand),
        }

        if !self.is_admin(user) {
            tracing::warn!(%user, command, "admin command from non-admin dropped");
            return Ok(AdminAction::Denied);
        }

        match command {
            "/grant" => self.grant(chat, args).await?,
            "/stats" => self.stats(chat).await?,
            "/broadcast" => self.broadcast(chat, args).await?,
            "/set_text" => self.set_text(chat, args).await?,
            "/add_channel" => self.add_channel(chat, args).await?,
            "/del_channel" => self.del_channel(chat, args).await?,
            "/channels" => self.list_channels(chat).await?,
            _ => unreachable!("filtered above"),
        }
        Ok(AdminAction::Handled)
    }

    async fn grant(&self, chat: ChatId, args: &str) -> Result<(), BotError> {
        let mut parts = args.split_whitespace();
        let target = parts.next().and_then(|s| s.parse::<i64>().ok());
        let amount = parts.next().and_then(|s| s.parse::<u64>().ok());
        let (Some(target), Some(amount)) = (target, amount) else {
            self.reply(chat, "Usage: /grant <user_id> <amount>").await;
            return Ok(());
        };

        match self.referrals.credit_reward(UserId::new(target), amount)? {
            Some(balance) => {
                tracing::info!(target, amount, balance, "admin grant");
                self.reply(
                    chat,
                    &format!("Granted {amount} to {target}. New balance: {balance}."),
                )
                .await;
            }
            None => {
                self.reply(chat, &format!("No such user: {target}.")).await;
            }
        }
        Ok(())
    }

    async fn stats(&self, chat: ChatId) -> Result<(), BotError> {
        let total = self.users.user_count()?;
        let verified = self.users.verified_count()?;
        self.reply(chat, &format!("Users: {total}\nVerified: {verified}"))
            .await;
        Ok(())
    }

    async fn broadcast(&self, chat: ChatId, args: &str) -> Result<(), BotError> {
        if args.is_empty() {
            self.reply(chat, "Usage: /broadcast <text>").await;
            return Ok(());
        }
        let recipients = self.users.all_user_ids()?;
        tracing::info!(recipients = recipients.len(), "broadcast starting");
        let report = broadcast::broadcast(&self.transport, &recipients, args).await;
        self.metrics.messages_sent.inc_by(report.sent);
        self.metrics.send_failures.inc_by(report.failed);
        self.reply(
            chat,
            &format!("Broadcast done: {} sent, {} failed.", report.sent, report.failed),
        )
        .await;
        Ok(())
    }

    async fn set_text(&self, chat: ChatId, args: &str) -> Result<(), BotError> {
        let mut parts = args.splitn(2, char::is_whitespace);
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("").trim();
        if key.is_empty() || value.is_empty() {
            self.reply(chat, "Usage: /set_text <key> <text>").await;
            return Ok(());
        }

        if self.texts.set(key, value)? {
            self.reply(chat, &format!("Updated {key}.")).await;
        } else {
            let known = TextKey::ALL.map(|k| k.as_str()).join(", ");
            self.reply(chat, &format!("Unknown key {key}. Valid keys: {known}"))
                .await;
        }
        Ok(())
    }

    async fn add_channel(&self, chat: ChatId, args: &str) -> Result<(), BotError> {
        if args.is_empty() {
            self.reply(chat, "Usage: /add_channel <@channel>").await;
            return Ok(());
        }
        let channel = ChannelId::new(args);
        if self.channels.add_channel(&channel)? {
            self.reply(chat, &format!("Added {args}.")).await;
        } else {
            self.reply(chat, &format!("{args} is already required.")).await;
        }
        Ok(())
    }

    async fn del_channel(&self, chat: ChatId, args: &str) -> Result<(), BotError> {
        if args.is_empty() {
            self.reply(chat, "Usage: /del_channel <@channel>").await;
            return Ok(());
        }
        let channel = ChannelId::new(args);
        if self.channels.remove_channel(&channel)? {
            self.reply(chat, &format!("Removed {args}.")).await;
        } else {
            self.reply(chat, &format!("{args} was not required.")).await;
        }
        Ok(())
    }

    async fn list_channels(&self, chat: ChatId) -> Result<(), BotError> {
        let channels = self.channels.required_channels()?;
        if channels.is_empty() {
            self.reply(chat, "No required channels.").await;
        } else {
            let list = channels
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            self.reply(chat, &format!("Required channels:\n{list}")).await;
        }
        Ok(())
    }

    /// Delivery failures are logged and dropped, like all outbound traffic.
    async fn reply(&self, chat: ChatId, text: &str) {
        match self.transport.send_message(chat, text).await {
            Ok(()) => self.metrics.messages_sent.inc(),
            Err(err) => {
                tracing::warn!(%chat, %err, "admin reply failed");
                self.metrics.send_failures.inc();
            }
        }
    }
}

/// Split a message into the command word (with any `@botname` suffix
/// removed) and the argument tail.
pub(crate) fn split_command(text: &str) -> (&str, &str) {
    let text = text.trim();
    let (head, tail) = match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (text, ""),
    };
    let command = head.split('@').next().unwrap_or(head);
    (command, tail)
}
